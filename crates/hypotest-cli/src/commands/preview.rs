//! `hypotest preview`: first rows and per-column summary of a CSV file.

use super::OutputFormat;
use crate::error::Result;
use crate::{loader, output};
use hypotest::data::{ColumnSummary, Dataset};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Preview<'a> {
    rows: usize,
    columns: Vec<&'a str>,
    head: Vec<Vec<String>>,
    summary: Vec<ColumnSummary>,
}

fn build(dataset: &Dataset, n: usize) -> Preview<'_> {
    Preview {
        rows: dataset.n_rows(),
        columns: dataset.column_names(),
        head: dataset.head(n),
        summary: dataset.describe(),
    }
}

pub(crate) fn run(file: &Path, rows: usize, format: OutputFormat) -> Result<()> {
    let dataset = loader::load_csv(file)?;
    let preview = build(&dataset, rows);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    output::section(&format!("{} ({} rows)", file.display(), preview.rows));
    let header: Vec<String> = preview.columns.iter().map(|c| (*c).to_string()).collect();
    output::table(&header, &preview.head);

    output::section("Summary");
    let header = ["Column", "Type", "Count", "Missing", "Distinct", "Mean", "Std", "Min", "Max"]
        .map(String::from);
    let summary: Vec<Vec<String>> = preview
        .summary
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.column_type.to_string(),
                s.count.to_string(),
                s.missing.to_string(),
                s.distinct.to_string(),
                output::opt_num(s.mean),
                output::opt_num(s.std),
                output::opt_num(s.min),
                output::opt_num(s.max),
            ]
        })
        .collect();
    output::table(&header, &summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypotest::data::Column;

    #[test]
    fn test_build_limits_head() {
        let ds = Dataset::new(vec![
            Column::from_f64("x", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
            Column::from_strs("g", &["a", "b", "a", "b", "a", "b", "a"]),
        ])
        .expect("valid dataset");
        let preview = build(&ds, 5);
        assert_eq!(preview.rows, 7);
        assert_eq!(preview.head.len(), 5);
        assert_eq!(preview.columns, vec!["x", "g"]);
        assert_eq!(preview.summary[1].distinct, 2);
    }
}
