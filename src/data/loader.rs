//! Results Loader Module
//! Loads experiment result CSV files into validated tables using Polars.

use crate::data::table::{ResultsTable, TableError};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Load a results CSV and validate its columns.
pub fn load_results_csv(file_path: &str) -> Result<ResultsTable, LoaderError> {
    // Lazy scan keeps memory flat for large sweeps, then collect
    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    Ok(ResultsTable::new(df)?)
}
