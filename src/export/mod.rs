//! Export functionality for simulation data.
//!
//! Provides CSV time-series export of voltage traces and JSON session export.

mod csv_export;
mod json_export;

pub use csv_export::{CsvExporter, TimeSeriesRecord};
pub use json_export::{export_session_json, export_session_json_to, SessionExport, EXPORT_VERSION};
