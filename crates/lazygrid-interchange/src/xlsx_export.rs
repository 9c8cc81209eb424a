//! Spreadsheet export
//!
//! One worksheet named after the dataset, a bold header row and typed cells.

use lazygrid_core::CellValue;
use rust_xlsxwriter::{Format, Workbook};

use crate::exporter::{ExportBackend, ExportError, ExportKind, ExportTable};

/// Worksheet names are limited to 31 characters
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, Default)]
pub struct XlsxBackend {
    /// Freeze the header row
    pub freeze_header: bool,
}

fn encoding(context: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ExportError + '_ {
    move |e| ExportError::Encoding(format!("{context}: {e}"))
}

fn sheet_name(dataset_name: &str) -> String {
    let cleaned: String = dataset_name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

impl ExportBackend for XlsxBackend {
    fn kind(&self) -> ExportKind {
        ExportKind::Xlsx
    }

    fn render(&self, table: &ExportTable<'_>) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook
            .add_worksheet()
            .set_name(sheet_name(table.dataset_name))
            .map_err(encoding("Failed to create sheet"))?;

        for (col, header) in table.headers().into_iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .map_err(encoding("Failed to write header"))?;
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row32 = (index + 1) as u32;
            for (col, column) in table.columns.iter().enumerate() {
                let col16 = col as u16;
                match row.get(column.field) {
                    CellValue::Integer(n) => worksheet.write_number(row32, col16, n as f64),
                    CellValue::Boolean(b) => worksheet.write_boolean(row32, col16, b),
                    CellValue::Text(s) => worksheet.write_string(row32, col16, &s),
                }
                .map_err(encoding("Failed to write cell"))?;
            }
        }

        if self.freeze_header {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(encoding("Failed to freeze header"))?;
        }

        workbook
            .save_to_buffer()
            .map_err(encoding("Failed to save XLSX workbook"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazygrid_core::{ColumnMeta, Record};

    #[test]
    fn renders_zip_container() {
        let columns = ColumnMeta::defaults();
        let rows = vec![
            Record::new(1, "delectus aut autem", false, 1),
            Record::new(2, "quis ut nam facilis", true, 1),
        ];
        let table = ExportTable {
            dataset_name: "todos",
            columns: &columns,
            rows: &rows,
        };
        let bytes = XlsxBackend { freeze_header: true }.render(&table).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn sheet_name_is_sanitized() {
        assert_eq!(sheet_name("todos"), "todos");
        assert_eq!(sheet_name("a/b:c"), "abc");
        assert_eq!(sheet_name("???"), "Sheet1");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), MAX_SHEET_NAME);
    }
}
