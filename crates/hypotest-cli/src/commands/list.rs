//! `hypotest tests`: list the test catalog.

use super::OutputFormat;
use crate::error::Result;
use crate::output;
use hypotest::catalog::{self, OperandType, TestContract};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CatalogEntry {
    name: &'static str,
    slug: &'static str,
    operands: usize,
    operand_type: OperandType,
    grouping_columns: usize,
    hypothesized_mean: bool,
    statistic: &'static str,
}

impl From<&TestContract> for CatalogEntry {
    fn from(c: &TestContract) -> Self {
        Self {
            name: c.kind.display_name(),
            slug: c.kind.slug(),
            operands: c.max_operands,
            operand_type: c.operand_type,
            grouping_columns: c.grouping_arity,
            hypothesized_mean: c.requires_hypothesized_value,
            statistic: c.statistic_name(),
        }
    }
}

pub(crate) fn run(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<CatalogEntry> = catalog::all().map(CatalogEntry::from).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            output::section("Supported Tests");
            let header = ["Test", "--test", "Requires", "Statistic"].map(String::from);
            let rows: Vec<Vec<String>> = catalog::all()
                .map(|c| {
                    vec![
                        c.kind.display_name().to_string(),
                        c.kind.slug().to_string(),
                        c.arity_summary(),
                        c.statistic_name().to_string(),
                    ]
                })
                .collect();
            output::table(&header, &rows);
        }
    }
    Ok(())
}
