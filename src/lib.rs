//! BiasChart - Bias / ROC-AUC experiment result chart renderer
//!
//! Renders pre-computed experiment results (one observation per row) as
//! statistical charts: a grid of dual-axis bias/ROC-AUC scatters and two
//! faceted swarm layouts.

pub mod charts;
pub mod data;

pub use charts::{ChartError, ChartRenderer, GridShape, Metric};
pub use data::{load_results_csv, LoaderError, ResultsTable, TableError};
