//! Terminal rendering of a grid page

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use lazygrid_core::{CellValue, ColumnMeta, Record};
use lazygrid_table::{GridViewState, SelectionMode, StatusSeverity, TableDensity};

fn cell_text(value: CellValue) -> String {
    match value {
        CellValue::Boolean(status) => format!(
            "{} [{}]",
            if status { "True" } else { "False" },
            StatusSeverity::for_status(status).as_str()
        ),
        other => other.to_string(),
    }
}

/// Horizontal cell padding per density
fn padding(density: TableDensity) -> (u16, u16) {
    match density {
        TableDensity::Small => (0, 0),
        TableDensity::Normal => (1, 1),
        TableDensity::Large => (2, 2),
    }
}

/// Leading marker cell: `P` for pinned rows, then the selection mark
fn marker(pinned: bool, selected: bool, mode: SelectionMode) -> String {
    let pin = if pinned { "P" } else { "" };
    let mark = match (mode.shows_checkbox_column(), selected) {
        (true, true) => "[x]",
        (true, false) => "[ ]",
        (false, true) => "*",
        (false, false) => "",
    };
    format!("{pin}{mark}")
}

fn row_cells(lead: String, record: &Record, columns: &[ColumnMeta]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(columns.len() + 1);
    cells.push(Cell::new(lead));
    cells.extend(columns.iter().map(|c| Cell::new(cell_text(record.get(c.field)))));
    cells
}

/// Active sort and filters, e.g. `sort: title DESC | filter: title contains aut`
fn query_summary(state: &GridViewState) -> Option<String> {
    let mut parts = Vec::new();
    if !state.sort().is_empty() {
        let sort: Vec<String> = state
            .sort()
            .iter()
            .map(|c| format!("{} {}", c.field, c.direction.label()))
            .collect();
        parts.push(format!("sort: {}", sort.join(", ")));
    }
    if !state.filters().is_empty() {
        let filters: Vec<String> = state
            .filters()
            .iter()
            .map(|(field, p)| format!("{} {} {}", field, p.operator.label(), p.value))
            .collect();
        parts.push(format!("filter: {}", filters.join(", ")));
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Pinned rows first, then the page
pub fn render_page(state: &GridViewState) -> String {
    let columns = state.visible_columns();
    let selection = state.selection();
    let mode = selection.mode();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    header.extend(columns.iter().map(|c| Cell::new(&c.header)));
    table.set_header(header);

    for record in state.pinned() {
        let lead = marker(true, selection.contains(record.id), mode);
        table.add_row(row_cells(lead, record, &columns));
    }
    for record in state.rows() {
        let lead = marker(false, selection.contains(record.id), mode);
        table.add_row(row_cells(lead, record, &columns));
    }

    let pad = padding(state.density());
    for column in table.column_iter_mut() {
        column.set_padding(pad);
    }

    let mut footer = format!(
        "{}  ({} selection, {} density)",
        state.status_text(),
        mode.display_name(),
        state.density().label()
    );
    if let Some(summary) = query_summary(state) {
        footer.push('\n');
        footer.push_str(&summary);
    }
    format!("{table}\n{footer}")
}
