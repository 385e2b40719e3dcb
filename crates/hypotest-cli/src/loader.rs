//! CSV loading into a [`Dataset`].
//!
//! The first row is the header. A column is numeric when every non-missing
//! cell parses as `f64`, otherwise categorical. Empty cells and the markers
//! `NA`, `NaN` and `null` (any case) are missing.

use crate::error::{CliError, Result};
use hypotest::data::{Column, Dataset};
use std::path::Path;
use tracing::debug;

const MISSING_MARKERS: [&str; 4] = ["", "na", "nan", "null"];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim().to_ascii_lowercase();
    MISSING_MARKERS.contains(&cell.as_str())
}

/// Infers one column from its raw cells.
fn infer_column(name: &str, cells: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(None)
            } else {
                cell.trim().parse::<f64>().ok().map(Some)
            }
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::categorical(
            name,
            cells
                .into_iter()
                .map(|cell| (!is_missing(&cell)).then(|| cell.trim().to_string()))
                .collect(),
        ),
    }
}

/// Loads a CSV file with a header row.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`] if `path` does not exist,
/// [`CliError::InvalidCsv`] for unreadable or ragged records, and a
/// validation error if the header has empty or duplicate names.
pub(crate) fn load_csv(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let invalid = |message: String| CliError::InvalidCsv {
        path: path.to_path_buf(),
        message,
    };

    let mut reader =
        csv::Reader::from_path(path).map_err(|e| invalid(format!("Failed to open CSV: {e}")))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| invalid(format!("Failed to read headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(invalid("header row is empty".to_string()));
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| invalid(format!("line {line}: {e}")))?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();
    let dataset = Dataset::new(columns)?;
    debug!(
        path = %path.display(),
        rows = dataset.n_rows(),
        cols = dataset.n_cols(),
        "loaded CSV"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypotest::data::ColumnType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_infers_column_types() {
        let file = csv_file("score,group\n1.5,a\n2,b\n3.25,a\n");
        let ds = load_csv(file.path()).expect("valid csv");
        assert_eq!(ds.shape(), (3, 2));
        let score = ds.column("score").expect("score");
        assert_eq!(score.column_type(), ColumnType::Numeric);
        assert_eq!(score.numeric_value(2), Some(3.25));
        assert_eq!(
            ds.column("group").expect("group").column_type(),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_missing_markers() {
        let file = csv_file("x,g\n1,a\n,NA\nNaN,b\nnull,\n5,c\n");
        let ds = load_csv(file.path()).expect("valid csv");
        let x = ds.column("x").expect("x");
        assert_eq!(x.column_type(), ColumnType::Numeric);
        assert_eq!(x.missing_count(), 3);
        let g = ds.column("g").expect("g");
        assert_eq!(g.missing_count(), 2);
    }

    #[test]
    fn test_numeric_looking_codes_with_text_become_categorical() {
        let file = csv_file("code\n1\n2\nx\n");
        let ds = load_csv(file.path()).expect("valid csv");
        let code = ds.column("code").expect("code");
        assert_eq!(code.column_type(), ColumnType::Categorical);
        assert_eq!(code.display_cell(0), "1");
    }

    #[test]
    fn test_ragged_record_is_invalid_csv() {
        let file = csv_file("a,b\n1,2\n3\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, CliError::InvalidCsv { .. }));
        assert_eq!(err.code(), 4);
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_duplicate_header_is_validation_error() {
        let file = csv_file("a,a\n1,2\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }
}
