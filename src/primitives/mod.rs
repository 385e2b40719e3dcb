//! Dense linear-algebra primitives.
//!
//! Only what the least-squares fit behind two-way ANOVA needs.

mod matrix;

pub use matrix::Matrix;
