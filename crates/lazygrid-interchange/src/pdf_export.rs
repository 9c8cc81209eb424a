//! Paginated document export
//!
//! Landscape A4 pages with the header row repeated at the top of every page
//! and a page counter in the footer. Column widths follow the longest cell
//! of each column, scaled to the printable width.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::exporter::{ExportBackend, ExportError, ExportKind, ExportTable};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 6.0;
const FONT_SIZE: f32 = 9.0;

/// Average Helvetica glyph width at [`FONT_SIZE`], in millimetres
const CHAR_WIDTH: f32 = 1.75;

#[derive(Debug, Clone, Default)]
pub struct PdfBackend {
    /// Title line printed above the table on the first page, defaults to
    /// the dataset name
    pub title: Option<String>,
}

fn encoding(context: &str) -> impl Fn(printpdf::Error) -> ExportError + '_ {
    move |e| ExportError::Encoding(format!("{context}: {e}"))
}

/// Body rows that fit under the header of one page
pub(crate) fn rows_per_page() -> usize {
    let body = PAGE_HEIGHT - 2.0 * MARGIN - 2.0 * LINE_HEIGHT;
    (body / LINE_HEIGHT).floor() as usize
}

pub(crate) fn page_count(rows: usize) -> usize {
    rows.div_ceil(rows_per_page()).max(1)
}

/// Column widths in millimetres, summing to the printable width
pub(crate) fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
    if headers.is_empty() {
        return Vec::new();
    }
    let chars: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(1)
                .max(1)
        })
        .collect();
    let total: usize = chars.iter().sum();
    let printable = PAGE_WIDTH - 2.0 * MARGIN;
    chars
        .iter()
        .map(|&c| printable * c as f32 / total as f32)
        .collect()
}

/// Cut `text` to what fits in `width` millimetres
fn fit(text: &str, width: f32) -> String {
    let capacity = ((width / CHAR_WIDTH).floor() as usize).max(1);
    if text.chars().count() <= capacity {
        return text.to_string();
    }
    let kept: String = text.chars().take(capacity.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn write_line(
    layer: &PdfLayerReference,
    cells: &[String],
    widths: &[f32],
    y: f32,
    font: &IndirectFontRef,
) {
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(widths) {
        layer.use_text(fit(cell, *width), FONT_SIZE, Mm(x), Mm(y), font);
        x += width;
    }
}

impl ExportBackend for PdfBackend {
    fn kind(&self) -> ExportKind {
        ExportKind::Pdf
    }

    fn render(&self, table: &ExportTable<'_>) -> Result<Vec<u8>, ExportError> {
        let headers = table.headers();
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows: Vec<Vec<String>> = table.text_rows().collect();
        let widths = column_widths(&headers, &rows);
        let title = self.title.as_deref().unwrap_or(table.dataset_name);

        let (doc, first_page, first_layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(encoding("Failed to load font"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(encoding("Failed to load font"))?;

        let pages = page_count(rows.len());
        let mut chunks = rows.chunks(rows_per_page());
        for page in 0..pages {
            let layer = if page == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (index, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table");
                doc.get_page(index).get_layer(layer)
            };

            let mut y = PAGE_HEIGHT - MARGIN;
            if page == 0 {
                layer.use_text(title, FONT_SIZE + 3.0, Mm(MARGIN), Mm(y), &bold);
            }
            y -= LINE_HEIGHT;
            write_line(&layer, &header_cells, &widths, y, &bold);

            for row in chunks.next().unwrap_or_default() {
                y -= LINE_HEIGHT;
                write_line(&layer, row, &widths, y, &regular);
            }

            layer.use_text(
                format!("Page {} of {}", page + 1, pages),
                FONT_SIZE - 1.0,
                Mm(PAGE_WIDTH - MARGIN - 25.0),
                Mm(MARGIN / 2.0),
                &regular,
            );
        }

        tracing::debug!(pages, rows = rows.len(), "pdf laid out");
        doc.save_to_bytes()
            .map_err(encoding("Failed to save PDF document"))
    }
}
