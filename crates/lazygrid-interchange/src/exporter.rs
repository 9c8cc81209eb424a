//! Export of loaded grid rows
//!
//! The exporter never fetches: it serializes exactly the rows it is handed.
//! Encoding is delegated to [`ExportBackend`] capabilities registered per
//! [`ExportKind`], so formats can be swapped or left out by the host.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use lazygrid_core::{ColumnMeta, Record};

use crate::csv_export::CsvBackend;
use crate::pdf_export::PdfBackend;
use crate::xlsx_export::XlsxBackend;

/// Errors during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No export backend registered for {0}")]
    BackendUnavailable(ExportKind),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// Delimited text
    Csv,
    /// Spreadsheet workbook
    Xlsx,
    /// Paginated document
    Pdf,
}

impl ExportKind {
    pub fn all() -> &'static [ExportKind] {
        &[ExportKind::Csv, ExportKind::Xlsx, ExportKind::Pdf]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Xlsx => "xlsx",
            ExportKind::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportKind::Csv => "text/csv",
            ExportKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportKind::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportKind::all()
            .iter()
            .copied()
            .find(|kind| kind.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))
    }
}

/// Rows and columns handed to a backend
#[derive(Debug, Clone, Copy)]
pub struct ExportTable<'a> {
    pub dataset_name: &'a str,
    pub columns: &'a [ColumnMeta],
    pub rows: &'a [Record],
}

impl ExportTable<'_> {
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Display text of every cell, row-major
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(|column| row.get(column.field).to_string())
                .collect()
        })
    }
}

/// Encoder for one artifact format
pub trait ExportBackend: Send + Sync {
    fn kind(&self) -> ExportKind;

    fn render(&self, table: &ExportTable<'_>) -> Result<Vec<u8>, ExportError>;
}

/// A finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub file_name: String,
    pub row_count: usize,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    /// Save the artifact under `dir`, creating the directory if needed
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "export written");
        Ok(path)
    }
}

/// Milliseconds since the Unix epoch
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub struct Exporter {
    dataset_name: String,
    backends: HashMap<ExportKind, Arc<dyn ExportBackend>>,
    clock: Clock,
}

impl Exporter {
    /// Exporter without any backend
    pub fn empty(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            backends: HashMap::new(),
            clock: Arc::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Exporter with a backend for every [`ExportKind`]
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self::empty(dataset_name)
            .with_backend(Arc::new(CsvBackend::default()))
            .with_backend(Arc::new(XlsxBackend::default()))
            .with_backend(Arc::new(PdfBackend::default()))
    }

    pub fn with_backend(mut self, backend: Arc<dyn ExportBackend>) -> Self {
        self.backends.insert(backend.kind(), backend);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    /// `{dataset}_export_{millis}.{ext}`
    pub fn file_name(&self, kind: ExportKind) -> String {
        format!(
            "{}_export_{}.{}",
            self.dataset_name,
            (self.clock)(),
            kind.extension()
        )
    }

    /// Serialize `rows` with the backend registered for `kind`.
    ///
    /// An empty row list still produces an artifact.
    #[tracing::instrument(skip(self, rows, columns), fields(rows = rows.len()))]
    pub fn export(
        &self,
        kind: ExportKind,
        rows: &[Record],
        columns: &[ColumnMeta],
    ) -> Result<ExportArtifact, ExportError> {
        let backend = self
            .backends
            .get(&kind)
            .ok_or(ExportError::BackendUnavailable(kind))?;

        let table = ExportTable {
            dataset_name: &self.dataset_name,
            columns,
            rows,
        };
        let bytes = backend.render(&table)?;
        let artifact = ExportArtifact {
            kind,
            file_name: self.file_name(kind),
            row_count: rows.len(),
            bytes,
        };

        tracing::info!(
            file_name = %artifact.file_name,
            rows = artifact.row_count,
            "export rendered"
        );
        Ok(artifact)
    }
}
