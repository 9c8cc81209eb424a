//! LazyGrid Interchange - export of loaded grid rows
//!
//! Formats are provided by [`ExportBackend`] implementations. The default
//! [`Exporter`] ships delimited text, spreadsheet and paginated document
//! backends; the host may replace any of them.

mod csv_export;
mod exporter;
mod pdf_export;
mod xlsx_export;

pub use csv_export::{CsvBackend, FieldDelimiter};
pub use exporter::*;
pub use pdf_export::PdfBackend;
pub use xlsx_export::XlsxBackend;
