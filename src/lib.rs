//! Emissions choropleth pipeline.
//!
//! Loads an emissions table and world boundaries, narrows the table to one
//! year and emission type, joins it onto the boundaries, derives quantile
//! colour bands and aggregates totals for the metric panels.

pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod map;
pub mod pipeline;
pub mod records;

pub use data::Sources;
pub use error::{DashboardError, DashboardResult};
pub use pipeline::{build_view, run, DashboardView, Selection};
