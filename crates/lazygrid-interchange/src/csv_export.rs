//! Delimited text export

use crate::exporter::{ExportBackend, ExportError, ExportKind, ExportTable};

/// Field delimiter choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldDelimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl FieldDelimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
            Self::Pipe => b'|',
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvBackend {
    delimiter: FieldDelimiter,
    include_headers: bool,
}

impl Default for CsvBackend {
    fn default() -> Self {
        Self {
            delimiter: FieldDelimiter::Comma,
            include_headers: true,
        }
    }
}

impl CsvBackend {
    pub fn with_delimiter(mut self, delimiter: FieldDelimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, include_headers: bool) -> Self {
        self.include_headers = include_headers;
        self
    }
}

impl ExportBackend for CsvBackend {
    fn kind(&self) -> ExportKind {
        ExportKind::Csv
    }

    fn render(&self, table: &ExportTable<'_>) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if self.include_headers {
            writer
                .write_record(table.headers())
                .map_err(|e| ExportError::Encoding(format!("CSV write error: {e}")))?;
        }

        for row in table.text_rows() {
            writer
                .write_record(&row)
                .map_err(|e| ExportError::Encoding(format!("CSV write error: {e}")))?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Encoding(format!("CSV flush error: {e}")))
    }
}
