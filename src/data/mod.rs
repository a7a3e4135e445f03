//! Data module - results table and CSV loading

mod loader;
mod table;

pub use loader::{load_results_csv, LoaderError};
pub use table::{ResultsTable, TableError, REQUIRED_COLUMNS};
