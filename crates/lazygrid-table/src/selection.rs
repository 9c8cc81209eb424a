//! Row selection
//!
//! Selection is keyed by record identity and is independent of pinning and
//! pagination: a selected record that is not on the current page stays
//! selected but is only addressable once its page is loaded again.

use indexmap::IndexMap;
use lazygrid_core::{Notification, Record, RecordId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How rows are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Clicking a row selects only that row
    #[default]
    Single,
    /// A checkbox column allows selecting many rows
    Checkbox,
}

impl SelectionMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Single => "Row Click",
            Self::Checkbox => "Checkbox",
        }
    }

    pub fn shows_checkbox_column(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

/// A record entering or leaving the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(Record),
    Unselected(Record),
}

impl SelectionChange {
    pub fn record(&self) -> &Record {
        match self {
            Self::Selected(record) | Self::Unselected(record) => record,
        }
    }

    /// Toast announcing this change
    pub fn to_notification(&self, ttl: Duration) -> Notification {
        let detail = format!("Title: {}", self.record().title);
        match self {
            Self::Selected(_) => Notification::info("Record Selected", detail),
            Self::Unselected(_) => Notification::warn("Record Unselected", detail),
        }
        .with_ttl(ttl)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    mode: SelectionMode,
    /// Selected identities in selection order, with the last seen record
    selected: IndexMap<RecordId, Record>,
}

impl SelectionSet {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: IndexMap::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.selected.contains_key(&id)
    }

    /// Last seen copy of a selected record
    pub fn snapshot(&self, id: RecordId) -> Option<&Record> {
        self.selected.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.selected.keys().copied()
    }

    /// Replace the whole selection and report what changed.
    ///
    /// In single mode only the last record of `records` is kept.
    pub fn set_selection(&mut self, records: Vec<Record>) -> Vec<SelectionChange> {
        let records = match self.mode {
            SelectionMode::Single => records.into_iter().last().into_iter().collect(),
            SelectionMode::Checkbox => records,
        };

        let mut next: IndexMap<RecordId, Record> = IndexMap::with_capacity(records.len());
        for record in records {
            next.insert(record.id, record);
        }

        let mut changes: Vec<SelectionChange> = self
            .selected
            .iter()
            .filter(|(id, _)| !next.contains_key(*id))
            .map(|(_, record)| SelectionChange::Unselected(record.clone()))
            .collect();
        changes.extend(
            next.iter()
                .filter(|(id, _)| !self.selected.contains_key(*id))
                .map(|(_, record)| SelectionChange::Selected(record.clone())),
        );

        self.selected = next;
        changes
    }

    /// Switch selection mode, clearing the selection if the mode changes
    pub fn set_mode(&mut self, mode: SelectionMode) -> Vec<SelectionChange> {
        if self.mode == mode {
            return Vec::new();
        }
        let changes = self.clear();
        self.mode = mode;
        changes
    }

    pub fn clear(&mut self) -> Vec<SelectionChange> {
        self.selected
            .drain(..)
            .map(|(_, record)| SelectionChange::Unselected(record))
            .collect()
    }

    /// Refresh stored snapshots after a row was edited
    pub fn refresh(&mut self, record: &Record) {
        if let Some(stored) = self.selected.get_mut(&record.id) {
            *stored = record.clone();
        }
    }

    /// Selected rows among `rows`, in the order of `rows`
    pub fn resolve(&self, rows: &[Record]) -> Vec<Record> {
        rows.iter()
            .filter(|row| self.contains(row.id))
            .cloned()
            .collect()
    }
}
