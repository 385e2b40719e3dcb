//! `Dataset` module for named, row-aligned columns.
//!
//! A minimal in-memory table: every column carries a single value type
//! (numeric or categorical) and explicit missing cells. Parsing from CSV or
//! any other external format is the caller's job.

use crate::error::{HypotestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Real-valued measurements.
    Numeric,
    /// Labels compared by exact equality.
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

/// Cell storage for one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric cells
    Numeric(Vec<Option<f64>>),
    /// Categorical cells
    Categorical(Vec<Option<String>>),
}

/// A distinct non-missing value of a column, used as a group or category key.
///
/// Numeric levels compare by exact value equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    /// Level taken from a numeric column
    Number(f64),
    /// Level taken from a categorical column
    Text(String),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Number(v) => write!(f, "{v}"),
            Level::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A named column of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Creates a numeric column. `NaN` cells are stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Creates a categorical column.
    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    /// Creates a numeric column with no missing cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypotest::data::Column;
    ///
    /// let col = Column::from_f64("height", &[1.70, 1.82, 1.65]);
    /// assert_eq!(col.len(), 3);
    /// ```
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::numeric(name, values.iter().copied().map(Some).collect())
    }

    /// Creates a categorical column with no missing cells.
    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::categorical(
            name,
            values.iter().map(|s| Some((*s).to_string())).collect(),
        )
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column's value type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self.data {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }

    /// Returns the raw cell storage.
    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Returns the number of cells, missing included.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    /// Returns true if the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the cell at `row` is missing (or out of range).
    #[must_use]
    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).map_or(true, Option::is_none),
            ColumnData::Categorical(v) => v.get(row).map_or(true, Option::is_none),
        }
    }

    /// Returns the number of missing cells.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    /// Returns the numeric value at `row`, or `None` if the cell is missing
    /// or the column is categorical.
    #[must_use]
    pub fn numeric_value(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten(),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Returns the cell at `row` as a [`Level`], or `None` if missing.
    #[must_use]
    pub fn level(&self, row: usize) -> Option<Level> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(Level::Number),
            ColumnData::Categorical(v) => v.get(row).cloned().flatten().map(Level::Text),
        }
    }

    /// Returns the distinct non-missing levels in first-encountered order.
    #[must_use]
    pub fn distinct_levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = Vec::new();
        for row in 0..self.len() {
            if let Some(level) = self.level(row) {
                if !levels.contains(&level) {
                    levels.push(level);
                }
            }
        }
        levels
    }

    /// Formats the cell at `row` for display; missing cells render as `NA`.
    #[must_use]
    pub fn display_cell(&self, row: usize) -> String {
        self.level(row)
            .map_or_else(|| "NA".to_string(), |level| level.to_string())
    }
}

/// A minimal table of named, row-aligned columns.
///
/// # Examples
///
/// ```
/// use hypotest::data::{Column, Dataset};
///
/// let ds = Dataset::new(vec![
///     Column::from_f64("x", &[1.0, 2.0, 3.0]),
///     Column::from_strs("g", &["a", "b", "a"]),
/// ])
/// .expect("columns are row-aligned");
/// assert_eq!(ds.shape(), (3, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Creates a new `Dataset` from columns.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, if columns have different
    /// lengths, or if a name is empty or duplicated.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let first = columns.first().ok_or_else(|| {
            HypotestError::InvalidDataset("dataset must have at least one column".to_string())
        })?;
        let n_rows = first.len();

        for col in &columns {
            if col.name.is_empty() {
                return Err(HypotestError::InvalidDataset(
                    "column names cannot be empty".to_string(),
                ));
            }
            if col.len() != n_rows {
                return Err(HypotestError::InvalidDataset(format!(
                    "column '{}' has {} rows, expected {n_rows}",
                    col.name,
                    col.len()
                )));
            }
        }

        let mut names: Vec<&str> = columns.iter().map(Column::name).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(HypotestError::InvalidDataset(format!(
                "duplicate column name '{}'",
                pair[0]
            )));
        }

        Ok(Self { columns, n_rows })
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Returns true if a column with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Returns a reference to a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`HypotestError::UnknownColumn`] if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| HypotestError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// Returns an iterator over the columns.
    pub fn iter_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the first `n` rows as display strings, one `Vec` per row.
    #[must_use]
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.n_rows))
            .map(|row| self.columns.iter().map(|c| c.display_cell(row)).collect())
            .collect()
    }

    /// Returns summary statistics for every column.
    #[must_use]
    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.columns.iter().map(ColumnSummary::from_column).collect()
    }
}

/// Summary of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub name: String,
    /// Value type.
    pub column_type: ColumnType,
    /// Number of non-missing cells.
    pub count: usize,
    /// Number of missing cells.
    pub missing: usize,
    /// Number of distinct non-missing values.
    pub distinct: usize,
    /// Mean (numeric columns only).
    pub mean: Option<f64>,
    /// Sample standard deviation (numeric columns with at least 2 values).
    pub std: Option<f64>,
    /// Minimum (numeric columns only).
    pub min: Option<f64>,
    /// Maximum (numeric columns only).
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn from_column(col: &Column) -> Self {
        let (mean, std, min, max) = match col.data() {
            ColumnData::Numeric(cells) => {
                let values: Vec<f64> = cells.iter().flatten().copied().collect();
                numeric_summary(&values)
            }
            ColumnData::Categorical(_) => (None, None, None, None),
        };

        Self {
            name: col.name().to_string(),
            column_type: col.column_type(),
            count: col.len() - col.missing_count(),
            missing: col.missing_count(),
            distinct: col.distinct_levels().len(),
            mean,
            std,
            min,
            max,
        }
    }
}

type NumericSummary = (Option<f64>, Option<f64>, Option<f64>, Option<f64>);

fn numeric_summary(values: &[f64]) -> NumericSummary {
    if values.is_empty() {
        return (None, None, None, None);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.len() > 1).then(|| {
        let ss = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
        (ss / (n - 1.0)).sqrt()
    });
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (Some(mean), std, Some(min), Some(max))
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
