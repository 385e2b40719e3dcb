//! Test catalog: the supported test kinds and their structural contracts.
//!
//! Each [`TestKind`] maps to a static [`TestContract`] describing how many
//! operand and grouping columns it takes, what value type the operands must
//! have, and the two sentence forms used to explain its verdict.
//!
//! # Examples
//!
//! ```
//! use hypotest::catalog::{self, TestKind};
//!
//! let contract = catalog::describe(TestKind::TwoWayAnova);
//! assert_eq!(contract.grouping_arity, 2);
//!
//! let kind: TestKind = "Paired T-Test".parse().expect("catalog name");
//! assert_eq!(kind, TestKind::Paired);
//! ```

use crate::data::ColumnType;
use crate::error::{HypotestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six supported hypothesis tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    /// Independent two-sample t-test
    TwoSample,
    /// Paired-difference t-test
    Paired,
    /// One-sample t-test against a hypothesized mean
    OneSample,
    /// One-way analysis of variance
    OneWayAnova,
    /// Two-way analysis of variance (interaction term)
    TwoWayAnova,
    /// Chi-square test of independence
    ChiSquare,
}

impl TestKind {
    /// All kinds in catalog order.
    pub const ALL: [TestKind; 6] = [
        TestKind::TwoSample,
        TestKind::Paired,
        TestKind::OneSample,
        TestKind::OneWayAnova,
        TestKind::TwoWayAnova,
        TestKind::ChiSquare,
    ];

    /// Human-readable name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            TestKind::TwoSample => "Two-Sample T-Test",
            TestKind::Paired => "Paired T-Test",
            TestKind::OneSample => "One-Sample T-Test",
            TestKind::OneWayAnova => "One-Way ANOVA",
            TestKind::TwoWayAnova => "Two-Way ANOVA",
            TestKind::ChiSquare => "Chi-Square Test",
        }
    }

    /// Short command-line identifier.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            TestKind::TwoSample => "two-sample",
            TestKind::Paired => "paired",
            TestKind::OneSample => "one-sample",
            TestKind::OneWayAnova => "anova",
            TestKind::TwoWayAnova => "two-way-anova",
            TestKind::ChiSquare => "chi-square",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TestKind {
    type Err = HypotestError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        let kind = match key.as_str() {
            "two-sample t-test" | "two-sample" | "t-test" | "ttest_ind" => TestKind::TwoSample,
            "paired t-test" | "paired" | "ttest_rel" => TestKind::Paired,
            "one-sample t-test" | "one-sample" | "ttest_1samp" => TestKind::OneSample,
            "anova" | "one-way anova" | "one-way-anova" => TestKind::OneWayAnova,
            "2-way anova" | "two-way anova" | "two-way-anova" => TestKind::TwoWayAnova,
            "chi-square test" | "chi-squared test" | "chi-square" | "chi-squared" => {
                TestKind::ChiSquare
            }
            _ => {
                return Err(HypotestError::UnknownTestKind {
                    name: s.to_string(),
                })
            }
        };
        Ok(kind)
    }
}

/// Value type a test requires of its operand columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandType {
    /// Operands must be numeric columns.
    Numeric,
    /// Operands are treated as categories; any column type is accepted.
    Categorical,
}

impl OperandType {
    /// Returns true if a column of `column_type` satisfies this requirement.
    #[must_use]
    pub fn accepts(self, column_type: ColumnType) -> bool {
        match self {
            OperandType::Numeric => column_type == ColumnType::Numeric,
            OperandType::Categorical => true,
        }
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandType::Numeric => write!(f, "numeric"),
            OperandType::Categorical => write!(f, "categorical"),
        }
    }
}

/// Outcome of comparing a p-value to the significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// `p_value < alpha`
    Reject,
    /// `p_value >= alpha`
    FailToReject,
}

impl Decision {
    /// `Reject` iff `p_value < alpha`; equality fails to reject.
    #[must_use]
    pub fn from_p_value(p_value: f64, alpha: f64) -> Self {
        if p_value < alpha {
            Decision::Reject
        } else {
            Decision::FailToReject
        }
    }

    /// Returns true for [`Decision::Reject`].
    #[must_use]
    pub fn is_reject(self) -> bool {
        self == Decision::Reject
    }

    /// Verb phrase used inside narrative sentences.
    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            Decision::Reject => "we reject",
            Decision::FailToReject => "we fail to reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Reject => write!(f, "Reject"),
            Decision::FailToReject => write!(f, "Fail to reject"),
        }
    }
}

/// Values substituted into a [`NarrativeTemplate`].
#[derive(Debug, Clone)]
pub struct NarrativeContext<'a> {
    /// Operand column names, in spec order
    pub operands: &'a [String],
    /// Grouping column names, in spec order
    pub groupings: &'a [String],
    /// Hypothesized mean (one-sample test)
    pub hypothesized_mean: Option<f64>,
    /// Computed statistic
    pub statistic: f64,
    /// Computed p-value
    pub p_value: f64,
    /// Significance level
    pub alpha: f64,
    /// Decision against `alpha`
    pub decision: Decision,
}

/// Reject / fail-to-reject sentence forms with `{placeholder}` slots.
///
/// Recognized placeholders: `{operand1}`, `{operand2}`, `{group1}`,
/// `{group2}`, `{hypothesized_mean}`, `{statistic_name}`, `{statistic}`,
/// `{p_value}`, `{alpha}`, `{decision}`. Unknown placeholders are left as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeTemplate {
    /// Sentence used when the null hypothesis is rejected
    pub reject: &'static str,
    /// Sentence used when it is not
    pub fail_to_reject: &'static str,
    /// Name of the statistic, e.g. "t-statistic"
    pub statistic_name: &'static str,
}

impl NarrativeTemplate {
    /// Fills the sentence form matching `ctx.decision`.
    #[must_use]
    pub fn render(&self, ctx: &NarrativeContext<'_>) -> String {
        let template = match ctx.decision {
            Decision::Reject => self.reject,
            Decision::FailToReject => self.fail_to_reject,
        };

        let mut out = String::with_capacity(template.len() + 64);
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    let key = &after[..end];
                    match self.lookup(key, ctx) {
                        Some(value) => out.push_str(&value),
                        None => {
                            out.push('{');
                            out.push_str(key);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, key: &str, ctx: &NarrativeContext<'_>) -> Option<String> {
        let nth = |names: &[String], i: usize| names.get(i).cloned();
        match key {
            "operand1" => nth(ctx.operands, 0),
            "operand2" => nth(ctx.operands, 1),
            "group1" => nth(ctx.groupings, 0),
            "group2" => nth(ctx.groupings, 1),
            "hypothesized_mean" => ctx.hypothesized_mean.map(|m| m.to_string()),
            "statistic_name" => Some(self.statistic_name.to_string()),
            "statistic" => Some(format!("{:.4}", ctx.statistic)),
            "p_value" => Some(format!("{:.4}", ctx.p_value)),
            "alpha" => Some(ctx.alpha.to_string()),
            "decision" => Some(ctx.decision.phrase().to_string()),
            _ => None,
        }
    }
}

/// Structural contract of one test kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestContract {
    /// Kind this contract describes
    pub kind: TestKind,
    /// Minimum number of operand columns
    pub min_operands: usize,
    /// Maximum number of operand columns
    pub max_operands: usize,
    /// Exact number of grouping columns (0, 1 or 2)
    pub grouping_arity: usize,
    /// Whether a hypothesized value is part of the test (defaults to 0)
    pub requires_hypothesized_value: bool,
    /// Required operand value type
    pub operand_type: OperandType,
    /// Verdict sentences
    pub template: NarrativeTemplate,
}

impl TestContract {
    /// Name of the statistic this test reports.
    #[must_use]
    pub fn statistic_name(&self) -> &'static str {
        self.template.statistic_name
    }

    /// Human-readable arity summary, e.g. "1 numeric operand, 2 grouping columns".
    #[must_use]
    pub fn arity_summary(&self) -> String {
        let operands = if self.min_operands == self.max_operands {
            self.min_operands.to_string()
        } else {
            format!("{}-{}", self.min_operands, self.max_operands)
        };
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let mut summary = format!(
            "{operands} {} operand{}",
            self.operand_type,
            plural(self.max_operands)
        );
        if self.grouping_arity > 0 {
            summary.push_str(&format!(
                ", {} grouping column{}",
                self.grouping_arity,
                plural(self.grouping_arity)
            ));
        }
        if self.requires_hypothesized_value {
            summary.push_str(", hypothesized mean (default 0)");
        }
        summary
    }
}

macro_rules! sentence {
    ($body:literal) => {
        concat!(
            "With a significance level of {alpha}, {decision} the null hypothesis: ",
            $body,
            " ({statistic_name} = {statistic}, p-value = {p_value})."
        )
    };
}

const TWO_SAMPLE: TestContract = TestContract {
    kind: TestKind::TwoSample,
    min_operands: 2,
    max_operands: 2,
    grouping_arity: 0,
    requires_hypothesized_value: false,
    operand_type: OperandType::Numeric,
    template: NarrativeTemplate {
        reject: sentence!(
            "there is a significant difference between the means of '{operand1}' and '{operand2}'"
        ),
        fail_to_reject: sentence!(
            "there is not enough evidence to conclude that the means of '{operand1}' and '{operand2}' differ"
        ),
        statistic_name: "t-statistic",
    },
};

const PAIRED: TestContract = TestContract {
    kind: TestKind::Paired,
    min_operands: 2,
    max_operands: 2,
    grouping_arity: 0,
    requires_hypothesized_value: false,
    operand_type: OperandType::Numeric,
    template: NarrativeTemplate {
        reject: sentence!(
            "there is a significant difference between the paired observations of '{operand1}' and '{operand2}'"
        ),
        fail_to_reject: sentence!(
            "there is not enough evidence to conclude that the paired observations of '{operand1}' and '{operand2}' differ"
        ),
        statistic_name: "t-statistic",
    },
};

const ONE_SAMPLE: TestContract = TestContract {
    kind: TestKind::OneSample,
    min_operands: 1,
    max_operands: 1,
    grouping_arity: 0,
    requires_hypothesized_value: true,
    operand_type: OperandType::Numeric,
    template: NarrativeTemplate {
        reject: sentence!(
            "the mean of '{operand1}' is significantly different from the hypothesized mean {hypothesized_mean}"
        ),
        fail_to_reject: sentence!(
            "the mean of '{operand1}' is not significantly different from the hypothesized mean {hypothesized_mean}"
        ),
        statistic_name: "t-statistic",
    },
};

const ONE_WAY_ANOVA: TestContract = TestContract {
    kind: TestKind::OneWayAnova,
    min_operands: 1,
    max_operands: 1,
    grouping_arity: 1,
    requires_hypothesized_value: false,
    operand_type: OperandType::Numeric,
    template: NarrativeTemplate {
        reject: sentence!(
            "there is a significant difference among the means of '{operand1}' across the groups of '{group1}'"
        ),
        fail_to_reject: sentence!(
            "there is not enough evidence to conclude that the means of '{operand1}' differ across the groups of '{group1}'"
        ),
        statistic_name: "F-statistic",
    },
};

const TWO_WAY_ANOVA: TestContract = TestContract {
    kind: TestKind::TwoWayAnova,
    min_operands: 1,
    max_operands: 1,
    grouping_arity: 2,
    requires_hypothesized_value: false,
    operand_type: OperandType::Numeric,
    template: NarrativeTemplate {
        reject: sentence!(
            "the interaction between '{group1}' and '{group2}' has a significant effect on '{operand1}'"
        ),
        fail_to_reject: sentence!(
            "there is not enough evidence of an interaction between '{group1}' and '{group2}' on '{operand1}'"
        ),
        statistic_name: "F-statistic",
    },
};

const CHI_SQUARE: TestContract = TestContract {
    kind: TestKind::ChiSquare,
    min_operands: 2,
    max_operands: 2,
    grouping_arity: 0,
    requires_hypothesized_value: false,
    operand_type: OperandType::Categorical,
    template: NarrativeTemplate {
        reject: sentence!("'{operand1}' and '{operand2}' are dependent"),
        fail_to_reject: sentence!(
            "there is not enough evidence to conclude that '{operand1}' and '{operand2}' are dependent"
        ),
        statistic_name: "chi-square statistic",
    },
};

/// Returns the contract for `kind`.
#[must_use]
pub fn describe(kind: TestKind) -> &'static TestContract {
    match kind {
        TestKind::TwoSample => &TWO_SAMPLE,
        TestKind::Paired => &PAIRED,
        TestKind::OneSample => &ONE_SAMPLE,
        TestKind::OneWayAnova => &ONE_WAY_ANOVA,
        TestKind::TwoWayAnova => &TWO_WAY_ANOVA,
        TestKind::ChiSquare => &CHI_SQUARE,
    }
}

/// Parses `name` as a test kind and returns its contract.
///
/// # Errors
///
/// Returns [`HypotestError::UnknownTestKind`] if `name` is not in the catalog.
pub fn describe_name(name: &str) -> Result<&'static TestContract> {
    name.parse::<TestKind>().map(describe)
}

/// All contracts in catalog order.
pub fn all() -> impl Iterator<Item = &'static TestContract> {
    TestKind::ALL.into_iter().map(describe)
}
