//! Results Table Module
//! Read-only view over a Polars DataFrame of experiment observations.

use polars::prelude::*;
use std::cmp::Ordering;
use thiserror::Error;

/// Columns every results table must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = ["m", "B", "H", "pseeds", "rocauc", "bias1"];

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Immutable results table. One row per experimental observation, with the
/// parameter columns `m`, `B`, `H`, `pseeds` and the score columns `rocauc`
/// and `bias1`.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    df: DataFrame,
}

impl ResultsTable {
    /// Wrap a DataFrame, checking that all required columns are present.
    pub fn new(df: DataFrame) -> Result<Self, TableError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|n| n == required) {
                return Err(TableError::MissingColumn(required.to_string()));
            }
        }
        Ok(Self { df })
    }

    /// Number of observations.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Borrow the underlying DataFrame.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Extract a column as row-aligned f64 values (None for nulls).
    pub fn column_f64(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let series = self.df.column(name)?;
        let as_f64 = series.cast(&DataType::Float64)?;
        let ca = as_f64.f64()?;
        Ok((0..self.df.height()).map(|i| ca.get(i)).collect())
    }

    /// Extract a column as row-aligned display labels (None for nulls).
    pub fn column_labels(&self, name: &str) -> Result<Vec<Option<String>>, TableError> {
        let series = self.df.column(name)?;
        let mut labels = Vec::with_capacity(self.df.height());
        for i in 0..self.df.height() {
            let value = series.get(i)?;
            if value.is_null() {
                labels.push(None);
            } else {
                labels.push(Some(value.to_string().trim_matches('"').to_string()));
            }
        }
        Ok(labels)
    }

    /// Distinct values of a column, ascending. Values that parse as numbers
    /// sort numerically, everything else lexically.
    pub fn distinct(&self, name: &str) -> Result<Vec<String>, TableError> {
        let mut values: Vec<String> = Vec::new();
        for label in self.column_labels(name)?.into_iter().flatten() {
            if !values.contains(&label) {
                values.push(label);
            }
        }
        values.sort_by(|a, b| compare_labels(a, b));
        Ok(values)
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("m".into(), vec![2i64, 1, 2, 1]),
            Column::new("B".into(), vec![10i64, 2, 2, 10]),
            Column::new("H".into(), vec![0.1f64, 0.5, 0.9, 0.5]),
            Column::new("pseeds".into(), vec![1i64, 2, 3, 4]),
            Column::new("rocauc".into(), vec![0.7f64, 0.8, 0.6, 0.9]),
            Column::new("bias1".into(), vec![0.4f64, 0.5, 0.55, 0.45]),
        ])
        .unwrap()
    }

    #[test]
    fn accepts_table_with_required_columns() {
        let table = ResultsTable::new(sample_df()).unwrap();
        assert_eq!(table.height(), 4);
        assert!(!table.is_empty());
    }

    #[test]
    fn rejects_table_missing_column() {
        let df = DataFrame::new(vec![
            Column::new("m".into(), vec![1i64]),
            Column::new("B".into(), vec![1i64]),
        ])
        .unwrap();
        match ResultsTable::new(df) {
            Err(TableError::MissingColumn(name)) => assert_eq!(name, "H"),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected MissingColumn"),
        }
    }

    #[test]
    fn distinct_sorts_numerically_ascending() {
        let table = ResultsTable::new(sample_df()).unwrap();
        assert_eq!(table.distinct("m").unwrap(), vec!["1", "2"]);
        // 2 before 10: numeric order, not lexical
        assert_eq!(table.distinct("B").unwrap(), vec!["2", "10"]);
    }

    #[test]
    fn column_f64_is_row_aligned() {
        let table = ResultsTable::new(sample_df()).unwrap();
        let h = table.column_f64("H").unwrap();
        assert_eq!(h.len(), 4);
        assert_eq!(h[0], Some(0.1));
        assert_eq!(h[2], Some(0.9));
        // integer columns cast cleanly
        let m = table.column_f64("m").unwrap();
        assert_eq!(m[1], Some(1.0));
    }

    #[test]
    fn column_labels_trim_quotes() {
        let table = ResultsTable::new(sample_df()).unwrap();
        let b = table.column_labels("B").unwrap();
        assert_eq!(b[0].as_deref(), Some("10"));
    }
}
