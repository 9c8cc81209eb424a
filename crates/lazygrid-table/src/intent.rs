//! Intents accepted by the grid and effects it asks the host to run

use lazygrid_core::{
    CellValue, ColumnMeta, FetchPlan, Field, FilterPredicate, GridResult, Notification, Record,
    RecordId, RecordPage, SortCriterion,
};
use lazygrid_interchange::ExportKind;

use crate::page_window::FetchWindow;
use crate::selection::SelectionMode;
use crate::view_state::{GridViewState, TableDensity};

/// User or system events
#[derive(Debug)]
pub enum GridIntent {
    /// (Re)load the current window
    Load,
    PageChanged { offset: usize, size: usize },
    NextPage,
    PrevPage,
    SortChanged(Vec<SortCriterion>),
    /// `None` removes the filter on `field`
    FilterChanged {
        field: Field,
        predicate: Option<FilterPredicate>,
    },
    ClearFilters,
    VisibleColumnsChanged(Vec<Field>),
    DensityChanged(TableDensity),
    /// `position` is the row index within the list the record is shown in
    TogglePin {
        record_id: RecordId,
        pinned: bool,
        position: usize,
    },
    BeginEdit { row: usize, field: Field },
    EditDraft(CellValue),
    CommitEdit,
    CancelEdit,
    SelectionChanged(Vec<RecordId>),
    SelectionModeChanged(SelectionMode),
    ExportRequested {
        kind: ExportKind,
        selection_only: bool,
    },
    FetchCompleted {
        seq: u64,
        result: GridResult<RecordPage>,
    },
}

impl GridIntent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::PageChanged { .. } => "page_changed",
            Self::NextPage => "next_page",
            Self::PrevPage => "prev_page",
            Self::SortChanged(_) => "sort_changed",
            Self::FilterChanged { .. } => "filter_changed",
            Self::ClearFilters => "clear_filters",
            Self::VisibleColumnsChanged(_) => "visible_columns_changed",
            Self::DensityChanged(_) => "density_changed",
            Self::TogglePin { .. } => "toggle_pin",
            Self::BeginEdit { .. } => "begin_edit",
            Self::EditDraft(_) => "edit_draft",
            Self::CommitEdit => "commit_edit",
            Self::CancelEdit => "cancel_edit",
            Self::SelectionChanged(_) => "selection_changed",
            Self::SelectionModeChanged(_) => "selection_mode_changed",
            Self::ExportRequested { .. } => "export_requested",
            Self::FetchCompleted { .. } => "fetch_completed",
        }
    }
}

/// A fetch to run against the record source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Sequence token; only the latest issued ticket is applied
    pub seq: u64,
    pub plan: FetchPlan,
}

impl FetchTicket {
    pub fn window(&self) -> FetchWindow {
        FetchWindow::new(self.plan.offset, self.plan.size)
    }
}

/// Rows and columns to hand to the exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub kind: ExportKind,
    pub rows: Vec<Record>,
    pub columns: Vec<ColumnMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    Notify(Notification),
    Export(ExportJob),
}

/// Result of reducing one intent
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GridViewState,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn fetches(&self) -> impl Iterator<Item = &FetchTicket> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Fetch(ticket) => Some(ticket),
            _ => None,
        })
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Notify(notification) => Some(notification),
            _ => None,
        })
    }
}
