//! `hypotest run`: run one hypothesis test against a CSV file.

use super::OutputFormat;
use crate::error::{CliError, Result};
use crate::{loader, output};
use hypotest::catalog::{self, TestKind};
use hypotest::config::EngineConfig;
use hypotest::dispatch::{run_test_with, TestDetails, TestResult, TestSpec};
use hypotest::stats::{AnovaTable, ContingencyTable};
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments of the `run` subcommand.
#[derive(Debug, Clone)]
pub(crate) struct RunArgs {
    pub(crate) file: PathBuf,
    pub(crate) test: String,
    pub(crate) columns: Vec<String>,
    pub(crate) groups: Vec<String>,
    pub(crate) mean: Option<f64>,
    pub(crate) alpha: f64,
    pub(crate) format: OutputFormat,
    pub(crate) config: Option<PathBuf>,
    pub(crate) equal_var: bool,
    pub(crate) no_yates: bool,
}

/// Reads an [`EngineConfig`] from JSON; missing keys keep their defaults.
pub(crate) fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| CliError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn engine_config(args: &RunArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if args.equal_var {
        config = config.with_equal_var(true);
    }
    if args.no_yates {
        config = config.with_yates_correction(false);
    }
    Ok(config)
}

fn build_spec(kind: TestKind, args: &RunArgs) -> TestSpec {
    let mut spec = TestSpec::new(kind)
        .with_operands(args.columns.iter().cloned())
        .with_grouping_columns(args.groups.iter().cloned())
        .with_alpha(args.alpha);
    if let Some(mean) = args.mean {
        spec = spec.with_hypothesized_mean(mean);
    }
    spec
}

pub(crate) fn run(args: &RunArgs) -> Result<()> {
    let kind: TestKind = args.test.parse()?;
    let config = engine_config(args)?;
    if args.equal_var && kind != TestKind::TwoSample {
        output::warning(&format!("--equal-var has no effect on {kind}"));
    }
    if args.no_yates && kind != TestKind::ChiSquare {
        output::warning(&format!("--no-yates has no effect on {kind}"));
    }

    let dataset = loader::load_csv(&args.file)?;
    let spec = build_spec(kind, args);
    info!(kind = %kind, file = %args.file.display(), "running test");
    let result = run_test_with(&dataset, &spec, &config)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text(&spec, &result),
    }
    Ok(())
}

fn print_text(spec: &TestSpec, result: &TestResult) {
    let contract = catalog::describe(result.kind);

    output::section(&result.kind.to_string());
    output::kv("Columns", spec.operands.join(", "));
    if !spec.grouping_columns.is_empty() {
        output::kv("Grouping", spec.grouping_columns.join(", "));
    }
    output::kv("Observations", result.n_observations);
    output::kv(contract.statistic_name(), output::num(result.statistic));
    output::kv("p-value", output::num(result.p_value));
    output::kv("alpha", result.alpha);

    match &result.details {
        TestDetails::TTest { df, sample_sizes } => {
            output::kv("df", output::num(*df));
            let sizes: Vec<String> = sample_sizes.iter().map(ToString::to_string).collect();
            output::kv("Sample sizes", sizes.join(", "));
        }
        TestDetails::OneWayAnova {
            df_between,
            df_within,
            groups,
        } => {
            output::kv("df", format!("({df_between}, {df_within})"));
            output::section("Groups");
            let header = ["Group", "Count", "Mean"].map(String::from);
            let rows: Vec<Vec<String>> = groups
                .iter()
                .map(|g| vec![g.level.to_string(), g.count.to_string(), output::num(g.mean)])
                .collect();
            output::table(&header, &rows);
        }
        TestDetails::TwoWayAnova { table } => print_anova_table(table),
        TestDetails::ChiSquare {
            df,
            corrected,
            table,
            ..
        } => {
            output::kv("df", df);
            output::kv("Yates correction", corrected);
            print_contingency_table(table);
        }
    }

    output::section("Verdict");
    output::verdict(result.decision);
    println!("\n{}", result.narrative);
}

fn print_anova_table(table: &AnovaTable) {
    output::section("ANOVA Table");
    let header = ["Term", "df", "Sum Sq", "Mean Sq", "F", "p-value"].map(String::from);
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|r| {
            vec![
                r.term.to_string(),
                r.df.to_string(),
                output::num(r.sum_sq),
                output::num(r.mean_sq),
                output::opt_num(r.f_statistic),
                output::opt_num(r.p_value),
            ]
        })
        .collect();
    output::table(&header, &rows);
}

fn print_contingency_table(table: &ContingencyTable) {
    output::section("Contingency Table");
    let header: Vec<String> = std::iter::once(String::new())
        .chain(table.col_levels().iter().map(ToString::to_string))
        .collect();
    let rows: Vec<Vec<String>> = table
        .row_levels()
        .iter()
        .zip(table.counts())
        .map(|(level, counts)| {
            std::iter::once(level.to_string())
                .chain(counts.iter().map(ToString::to_string))
                .collect()
        })
        .collect();
    output::table(&header, &rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args() -> RunArgs {
        RunArgs {
            file: PathBuf::from("data.csv"),
            test: "two-sample".to_string(),
            columns: vec!["A".to_string(), "B".to_string()],
            groups: Vec::new(),
            mean: None,
            alpha: 0.05,
            format: OutputFormat::Text,
            config: None,
            equal_var: false,
            no_yates: false,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"yates_correction": true, "default_hypothesized_mean": 1.5}"#)
            .expect("write config");

        let mut a = args();
        a.config = Some(file.path().to_path_buf());
        a.no_yates = true;
        let config = engine_config(&a).expect("valid config");
        assert!(!config.yates_correction);
        assert_eq!(config.default_hypothesized_mean, 1.5);
    }

    #[test]
    fn test_malformed_config() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"{not json").expect("write config");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig { .. }));
    }

    #[test]
    fn test_build_spec_carries_mean() {
        let mut a = args();
        a.columns = vec!["score".to_string()];
        a.mean = Some(2.5);
        let spec = build_spec(TestKind::OneSample, &a);
        assert_eq!(spec.hypothesized_mean, Some(2.5));
        assert_eq!(spec.operands, vec!["score"]);
    }

    #[test]
    fn test_unknown_test_is_validation_error() {
        let mut a = args();
        a.test = "z-test".to_string();
        let err = run(&a).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }
}
