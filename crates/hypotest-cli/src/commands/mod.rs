//! Command implementations

pub(crate) mod list;
pub(crate) mod preview;
pub(crate) mod run;

use clap::ValueEnum;

/// Output format shared by all commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}
