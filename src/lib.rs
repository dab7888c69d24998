//! Flattens campaign cookie attribution data from CSV exports into a fixed-schema CSV.

pub mod config;
pub mod decoder;
pub mod error;
pub mod fields;
pub mod pipeline;
pub mod query;
pub mod reconcile;
pub mod runner;
pub mod table;

pub use config::{RunConfig, TaskConfig};
pub use error::{RowError, RunOutcome};
pub use pipeline::{process_rows, OutputRecord, RawRow, SkipTally};
pub use runner::{run_task, RunOptions};
