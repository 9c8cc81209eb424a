//! Pure state transitions of the grid
//!
//! `reduce` never performs IO. Anything that has to happen outside the
//! state (fetching, toasts, exports) is returned as an [`Effect`].

use lazygrid_core::{CellValue, FetchPlan, GridResult, Notification, Record, RecordId, RecordPage};

use crate::edit_session::{EditOutcome, EditorKind};
use crate::intent::{Effect, ExportJob, FetchTicket, GridIntent, Transition};
use crate::page_window::FetchWindow;
use crate::pin_set::PinOutcome;
use crate::selection::SelectionChange;
use crate::view_state::{GridViewState, LoadStatus};

/// Apply `intent` to `state`
pub fn reduce(state: &GridViewState, intent: GridIntent) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match intent {
        GridIntent::Load => {
            let window = next.window.current();
            issue_fetch(&mut next, &mut effects, window);
        }
        GridIntent::PageChanged { offset, size } => match next.window.request(offset, size) {
            Ok(window) => change_page(&mut next, &mut effects, window),
            Err(e) => {
                tracing::warn!(offset, size, error = %e, "page change rejected");
                effects.push(warn(&next, "Invalid Page", e.to_string()));
            }
        },
        GridIntent::NextPage => {
            if let Some(window) = next.window.next() {
                change_page(&mut next, &mut effects, window);
            }
        }
        GridIntent::PrevPage => {
            if let Some(window) = next.window.prev() {
                change_page(&mut next, &mut effects, window);
            }
        }
        GridIntent::SortChanged(sort) => {
            let sort: Vec<_> = sort
                .into_iter()
                .filter(|criterion| next.column(criterion.field).is_some_and(|c| c.sortable))
                .collect();
            if sort != next.sort {
                next.sort = sort;
                let first = next.window.first();
                change_page(&mut next, &mut effects, first);
            }
        }
        GridIntent::FilterChanged { field, predicate } => {
            if !next.column(field).is_some_and(|c| c.filterable) {
                tracing::debug!(field = %field, "filter on non-filterable column ignored");
            } else {
                let changed = match predicate {
                    Some(predicate) => next.filters.insert(field, predicate.clone()) != Some(predicate),
                    None => next.filters.remove(&field).is_some(),
                };
                if changed {
                    let first = next.window.first();
                    change_page(&mut next, &mut effects, first);
                }
            }
        }
        GridIntent::ClearFilters => {
            if !next.filters.is_empty() {
                next.filters.clear();
                let first = next.window.first();
                change_page(&mut next, &mut effects, first);
            }
        }
        GridIntent::VisibleColumnsChanged(fields) => {
            next.visible = next.known_fields(&fields);
        }
        GridIntent::DensityChanged(density) => {
            next.density = density;
        }
        GridIntent::TogglePin {
            record_id,
            pinned,
            position,
        } => toggle_pin(&mut next, record_id, pinned, position),
        GridIntent::BeginEdit { row, field } => {
            let editable = next.column(field).is_some_and(|c| c.editable);
            let outcome = if editable {
                let GridViewState {
                    edit,
                    rows,
                    edit_policy,
                    ..
                } = &mut next;
                edit.begin(rows, row, field, edit_policy)
            } else {
                EditOutcome::Rejected
            };
            tracing::debug!(row, field = %field, ?outcome, "begin edit");
        }
        GridIntent::EditDraft(value) => {
            if let Err(e) = next.edit.set_draft(value) {
                effects.push(warn(&next, "Invalid Value", e.to_string()));
            }
        }
        GridIntent::CommitEdit => {
            let GridViewState { edit, rows, .. } = &mut next;
            if let EditOutcome::Committed(record) = edit.commit(rows) {
                next.selection.refresh(&record);
            }
        }
        GridIntent::CancelEdit => {
            next.edit.cancel();
        }
        GridIntent::SelectionChanged(ids) => {
            let records = resolve_ids(&next, &ids);
            let changes = next.selection.set_selection(records);
            notify_selection(&next, &mut effects, changes);
        }
        GridIntent::SelectionModeChanged(mode) => {
            let changes = next.selection.set_mode(mode);
            notify_selection(&next, &mut effects, changes);
        }
        GridIntent::ExportRequested {
            kind,
            selection_only,
        } => {
            let rows = if selection_only {
                next.selected_rows()
            } else {
                next.loaded_rows()
            };
            effects.push(Effect::Export(ExportJob {
                kind,
                rows,
                columns: next.visible_columns(),
            }));
        }
        GridIntent::FetchCompleted { seq, result } => {
            complete_fetch(&mut next, &mut effects, seq, result);
        }
    }

    Transition {
        state: next,
        effects,
    }
}

fn warn(state: &GridViewState, summary: &str, detail: String) -> Effect {
    Effect::Notify(Notification::warn(summary, detail).with_ttl(state.notification_ttl))
}

/// Navigate to `window`; the displayed page only moves once the fetch lands
fn change_page(state: &mut GridViewState, effects: &mut Vec<Effect>, window: FetchWindow) {
    if state.edit.cancel() == EditOutcome::Cancelled {
        tracing::debug!("edit cancelled by page change");
    }
    issue_fetch(state, effects, window);
}

fn issue_fetch(state: &mut GridViewState, effects: &mut Vec<Effect>, window: FetchWindow) {
    let plan = FetchPlan {
        offset: window.offset,
        size: window.size,
        sort: state.sort.clone(),
        filters: state.filters.clone(),
    };

    if let Some(in_flight) = &state.in_flight {
        if in_flight.plan == plan {
            tracing::debug!(seq = in_flight.seq, "identical fetch already in flight");
            return;
        }
    }

    let ticket = FetchTicket {
        seq: state.next_seq,
        plan,
    };
    state.next_seq += 1;
    state.status = LoadStatus::Loading { seq: ticket.seq };
    state.in_flight = Some(ticket.clone());
    tracing::debug!(
        seq = ticket.seq,
        offset = window.offset,
        size = window.size,
        "fetch issued"
    );
    effects.push(Effect::Fetch(ticket));
}

fn complete_fetch(
    state: &mut GridViewState,
    effects: &mut Vec<Effect>,
    seq: u64,
    result: GridResult<RecordPage>,
) {
    let ticket = match &state.in_flight {
        Some(ticket) if ticket.seq == seq => ticket.clone(),
        _ => {
            tracing::debug!(seq, "stale fetch completion dropped");
            return;
        }
    };
    state.in_flight = None;

    match result {
        Ok(page) => {
            let requested = ticket.window();
            let clamped = requested.clamped_to(page.total);
            if clamped != requested {
                // The collection shrank below the requested page
                tracing::debug!(
                    offset = requested.offset,
                    total = page.total,
                    "requested page out of range, refetching last page"
                );
                issue_fetch(state, effects, clamped);
                return;
            }

            state.window.apply_response(requested, page.total);
            state.rows = state.pins.exclude_pinned(page.records);
            state.edit.cancel();
            state.status = LoadStatus::Idle;
            tracing::debug!(
                seq,
                rows = state.rows.len(),
                total = page.total,
                "page applied"
            );
        }
        Err(e) => {
            tracing::warn!(seq, error = %e, "fetch failed");
            let message = e.to_string();
            effects.push(warn(state, "Failed to load records", message.clone()));
            state.status = LoadStatus::Failed { message };
        }
    }
}

fn toggle_pin(state: &mut GridViewState, record_id: RecordId, pinned: bool, position: usize) {
    let source: &[Record] = if pinned {
        state.pins.rows()
    } else {
        &state.rows
    };
    let Some(record) = source.iter().find(|r| r.id == record_id).cloned() else {
        tracing::debug!(id = record_id, pinned, "toggle on unknown record ignored");
        return;
    };

    let GridViewState { pins, rows, .. } = &mut *state;
    match pins.toggle(rows, &record, pinned, position) {
        PinOutcome::Pinned | PinOutcome::Unpinned => {
            if state.edit.is_editing() {
                // Row indices moved under the session
                state.edit.cancel();
            }
        }
        PinOutcome::Refused | PinOutcome::NotFound => {}
    }
}

/// Loaded records for `ids`, falling back to the stored selection snapshot
fn resolve_ids(state: &GridViewState, ids: &[RecordId]) -> Vec<Record> {
    let loaded = state.loaded_rows();
    ids.iter()
        .filter_map(|id| {
            loaded
                .iter()
                .find(|r| r.id == *id)
                .cloned()
                .or_else(|| state.selection.snapshot(*id).cloned())
        })
        .collect()
}

fn notify_selection(state: &GridViewState, effects: &mut Vec<Effect>, changes: Vec<SelectionChange>) {
    effects.extend(
        changes
            .iter()
            .map(|change| Effect::Notify(change.to_notification(state.notification_ttl))),
    );
}

/// Parse raw editor input for the active session
pub fn parse_draft(state: &GridViewState, raw: &str) -> Option<CellValue> {
    let session = state.edit.session()?;
    EditorKind::for_kind(session.field.kind())?.parse(raw)
}
