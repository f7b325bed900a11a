//! Reporter module for output formatting

pub mod console;
pub mod csv;
pub mod json;

pub use console::ConsoleReporter;
pub use csv::{CsvExporter, ExportFormat};
pub use json::JsonReporter;
