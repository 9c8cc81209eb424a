//! Grid view state
//!
//! [`GridViewState`] is an immutable snapshot of everything a grid shows.
//! It is only ever replaced, through [`crate::reduce`].

use lazygrid_core::{
    ColumnMeta, Field, FilterPredicate, GridResult, Record, SortCriterion,
    DEFAULT_NOTIFICATION_TTL,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::edit_session::{EditPolicy, EditState};
use crate::intent::FetchTicket;
use crate::page_window::{PageWindow, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZES};
use crate::pin_set::{PinSet, DEFAULT_PIN_CAP};
use crate::selection::{SelectionMode, SelectionSet};

/// Row density of the rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableDensity {
    Small,
    #[default]
    Normal,
    Large,
}

impl TableDensity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Normal => "Normal",
            Self::Large => "Large",
        }
    }
}

/// Loading status of the grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    /// Waiting for the fetch carrying this sequence token
    Loading { seq: u64 },
    /// The last fetch failed; rows are from the last successful one
    Failed { message: String },
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Initial configuration of a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub page_size: usize,
    pub page_sizes: Vec<usize>,
    pub max_pinned: usize,
    pub selection_mode: SelectionMode,
    pub notification_ttl: Duration,
    pub edit_policy: EditPolicy,
    pub columns: Vec<ColumnMeta>,
    /// `None` shows every column
    pub visible_columns: Option<Vec<Field>>,
    pub density: TableDensity,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            max_pinned: DEFAULT_PIN_CAP,
            selection_mode: SelectionMode::default(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            edit_policy: EditPolicy::default(),
            columns: ColumnMeta::defaults(),
            visible_columns: None,
            density: TableDensity::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridViewState {
    pub(crate) columns: Vec<ColumnMeta>,
    pub(crate) visible: Vec<Field>,
    pub(crate) density: TableDensity,
    pub(crate) notification_ttl: Duration,
    pub(crate) window: PageWindow,
    /// Rows of the current page that are not pinned
    pub(crate) rows: Vec<Record>,
    pub(crate) pins: PinSet,
    pub(crate) edit: EditState,
    pub(crate) edit_policy: EditPolicy,
    pub(crate) selection: SelectionSet,
    pub(crate) sort: Vec<SortCriterion>,
    pub(crate) filters: BTreeMap<Field, FilterPredicate>,
    pub(crate) status: LoadStatus,
    pub(crate) in_flight: Option<FetchTicket>,
    pub(crate) next_seq: u64,
}

impl GridViewState {
    pub fn new(config: &GridConfig) -> GridResult<Self> {
        let window = PageWindow::new(config.page_size, config.page_sizes.clone())?;
        let mut state = Self {
            columns: config.columns.clone(),
            visible: Vec::new(),
            density: config.density,
            notification_ttl: config.notification_ttl,
            window,
            rows: Vec::new(),
            pins: PinSet::new(config.max_pinned),
            edit: EditState::default(),
            edit_policy: config.edit_policy.clone(),
            selection: SelectionSet::new(config.selection_mode),
            sort: Vec::new(),
            filters: BTreeMap::new(),
            status: LoadStatus::Idle,
            in_flight: None,
            next_seq: 1,
        };
        state.visible = match &config.visible_columns {
            Some(fields) => state.known_fields(fields),
            None => state.columns.iter().map(|c| c.field).collect(),
        };
        Ok(state)
    }

    /// `fields` restricted to defined columns, without duplicates
    pub(crate) fn known_fields(&self, fields: &[Field]) -> Vec<Field> {
        let mut known = Vec::with_capacity(fields.len());
        for field in fields {
            if self.column(*field).is_some() && !known.contains(field) {
                known.push(*field);
            }
        }
        known
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn column(&self, field: Field) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Visible columns in definition order
    pub fn visible_columns(&self) -> Vec<ColumnMeta> {
        self.columns
            .iter()
            .filter(|c| self.visible.contains(&c.field))
            .cloned()
            .collect()
    }

    pub fn is_column_visible(&self, field: Field) -> bool {
        self.visible.contains(&field)
    }

    pub fn density(&self) -> TableDensity {
        self.density
    }

    pub fn notification_ttl(&self) -> Duration {
        self.notification_ttl
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn pinned(&self) -> &[Record] {
        self.pins.rows()
    }

    pub fn pins(&self) -> &PinSet {
        &self.pins
    }

    /// Pinned rows followed by working rows
    pub fn loaded_rows(&self) -> Vec<Record> {
        self.pins
            .rows()
            .iter()
            .chain(self.rows.iter())
            .cloned()
            .collect()
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn edit_policy(&self) -> &EditPolicy {
        &self.edit_policy
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selected rows among the loaded ones
    pub fn selected_rows(&self) -> Vec<Record> {
        self.selection.resolve(&self.loaded_rows())
    }

    pub fn sort(&self) -> &[SortCriterion] {
        &self.sort
    }

    pub fn filters(&self) -> &BTreeMap<Field, FilterPredicate> {
        &self.filters
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    pub fn status_text(&self) -> String {
        self.window.status_text(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_columns_visible_by_default() {
        let state = GridViewState::new(&GridConfig::default()).unwrap();
        let fields: Vec<Field> = state.visible_columns().iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![Field::Id, Field::Title, Field::Completed]);
        assert_eq!(state.status(), &LoadStatus::Idle);
    }

    #[test]
    fn configured_visibility_ignores_unknown_fields() {
        let config = GridConfig {
            visible_columns: Some(vec![Field::Completed, Field::OwnerId, Field::Id]),
            ..GridConfig::default()
        };
        let state = GridViewState::new(&config).unwrap();
        let fields: Vec<Field> = state.visible_columns().iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![Field::Id, Field::Completed]);
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        let config = GridConfig {
            page_size: 7,
            ..GridConfig::default()
        };
        assert!(GridViewState::new(&config).is_err());
    }
}
