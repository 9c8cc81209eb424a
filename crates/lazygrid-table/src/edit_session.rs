//! Inline row editing
//!
//! One row at a time can be in edit mode. Starting an edit on another row
//! drops the current draft; committing replaces exactly the edited row.

use lazygrid_core::{CellValue, ColumnKind, Field, GridError, GridResult, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Rows whose `field` equals `value` are read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub field: Field,
    pub value: CellValue,
}

impl ExclusionRule {
    pub fn new(field: Field, value: CellValue) -> Self {
        Self { field, value }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.get(self.field) == self.value
    }
}

/// Editability predicate for rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPolicy {
    rules: Vec<ExclusionRule>,
}

impl EditPolicy {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    pub fn is_editable(&self, record: &Record) -> bool {
        !self.rules.iter().any(|rule| rule.matches(record))
    }
}

/// Badge style of the completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSeverity {
    Success,
    Danger,
}

impl StatusSeverity {
    pub fn for_status(completed: bool) -> Self {
        if completed {
            Self::Success
        } else {
            Self::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// One entry of a closed-choice editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: CellValue,
    pub severity: StatusSeverity,
}

/// Editor used for a column, chosen by value kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKind {
    Text,
    Choice(Vec<ChoiceOption>),
}

impl EditorKind {
    /// Editor for a column kind; integer columns are not edited inline
    pub fn for_kind(kind: ColumnKind) -> Option<EditorKind> {
        match kind {
            ColumnKind::Text => Some(EditorKind::Text),
            ColumnKind::Boolean => Some(EditorKind::Choice(
                [true, false]
                    .into_iter()
                    .map(|status| ChoiceOption {
                        label: if status { "True" } else { "False" },
                        value: CellValue::Boolean(status),
                        severity: StatusSeverity::for_status(status),
                    })
                    .collect(),
            )),
            ColumnKind::Integer => None,
        }
    }

    /// Coerce raw editor input into a cell value
    pub fn parse(&self, raw: &str) -> Option<CellValue> {
        match self {
            EditorKind::Text => Some(CellValue::Text(raw.to_string())),
            EditorKind::Choice(options) => options
                .iter()
                .find(|option| option.label.eq_ignore_ascii_case(raw.trim()))
                .map(|option| option.value.clone()),
        }
    }
}

/// The active edit of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub row_index: usize,
    pub field: Field,
    pub original: Record,
    pub draft: Record,
}

impl EditSession {
    pub fn record_id(&self) -> RecordId {
        self.original.id
    }

    pub fn draft_value(&self) -> CellValue {
        self.draft.get(self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Started,
    /// The row is read-only, out of range, or the field has no editor
    Rejected,
    Committed(Record),
    Cancelled,
    /// The row under the session changed; the draft was dropped
    Dropped,
    NoSession,
}

/// Holder of the single active edit session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    session: Option<EditSession>,
}

impl EditState {
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_editing_row(&self, row_index: usize) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.row_index == row_index)
    }

    /// Enter edit mode for `rows[row_index]`.
    ///
    /// A session on another row is cancelled first. Rejected entries leave
    /// any current session untouched.
    pub fn begin(
        &mut self,
        rows: &[Record],
        row_index: usize,
        field: Field,
        policy: &EditPolicy,
    ) -> EditOutcome {
        let Some(record) = rows.get(row_index) else {
            return EditOutcome::Rejected;
        };
        if !policy.is_editable(record) || EditorKind::for_kind(field.kind()).is_none() {
            tracing::debug!(id = record.id, field = %field, "edit rejected");
            return EditOutcome::Rejected;
        }

        if let Some(previous) = self.session.take() {
            tracing::debug!(
                id = previous.record_id(),
                row = previous.row_index,
                "previous edit cancelled by new session"
            );
        }

        self.session = Some(EditSession {
            row_index,
            field,
            original: record.clone(),
            draft: record.clone(),
        });
        EditOutcome::Started
    }

    /// Replace the draft value of the session field
    pub fn set_draft(&mut self, value: CellValue) -> GridResult<()> {
        let field = self
            .session
            .as_ref()
            .map(|session| session.field)
            .ok_or_else(|| GridError::Other("no active edit session".to_string()))?;
        self.set_draft_field(field, value)
    }

    /// Replace the draft value of any field of the edited row
    pub fn set_draft_field(&mut self, field: Field, value: CellValue) -> GridResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| GridError::Other("no active edit session".to_string()))?;
        session.draft = session.draft.with_value(field, value)?;
        Ok(())
    }

    /// Write the draft into `rows` at the session index
    pub fn commit(&mut self, rows: &mut [Record]) -> EditOutcome {
        let Some(session) = self.session.take() else {
            return EditOutcome::NoSession;
        };
        match rows.get_mut(session.row_index) {
            Some(row) if row.id == session.record_id() => {
                *row = session.draft.clone();
                tracing::debug!(id = row.id, row = session.row_index, "edit committed");
                EditOutcome::Committed(session.draft)
            }
            _ => {
                tracing::warn!(
                    id = session.record_id(),
                    row = session.row_index,
                    "edited row moved before commit, draft dropped"
                );
                EditOutcome::Dropped
            }
        }
    }

    pub fn cancel(&mut self) -> EditOutcome {
        match self.session.take() {
            Some(_) => EditOutcome::Cancelled,
            None => EditOutcome::NoSession,
        }
    }
}
