//! Core types for LazyGrid

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{GridError, GridResult};

/// Stable identity of a record
pub type RecordId = i64;

/// A single row of the remote collection.
///
/// Field names on the wire follow the remote todo collection
/// (`userId` rather than `owner_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub owner_id: i64,
}

impl Record {
    pub fn new(id: RecordId, title: impl Into<String>, completed: bool, owner_id: i64) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
            owner_id,
        }
    }

    /// Read a single cell
    pub fn get(&self, field: Field) -> CellValue {
        match field {
            Field::Id => CellValue::Integer(self.id),
            Field::Title => CellValue::Text(self.title.clone()),
            Field::Completed => CellValue::Boolean(self.completed),
            Field::OwnerId => CellValue::Integer(self.owner_id),
        }
    }

    /// Return a copy of this record with one cell replaced.
    ///
    /// The identity column cannot be rewritten; every other field only
    /// accepts a value of its own kind.
    pub fn with_value(&self, field: Field, value: CellValue) -> GridResult<Record> {
        let mut next = self.clone();
        match (field, value) {
            (Field::Id, _) => {
                return Err(GridError::invalid_value(field, "record identity is immutable"));
            }
            (Field::Title, CellValue::Text(title)) => next.title = title,
            (Field::Completed, CellValue::Boolean(completed)) => next.completed = completed,
            (Field::OwnerId, CellValue::Integer(owner_id)) => next.owner_id = owner_id,
            (field, value) => {
                return Err(GridError::invalid_value(
                    field,
                    format!("expected {} value, got {}", field.kind(), value.kind()),
                ));
            }
        }
        Ok(next)
    }
}

/// Columns of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "userId")]
    OwnerId,
}

impl Field {
    /// All fields in column definition order
    pub fn all() -> &'static [Field] {
        &[Field::Id, Field::Title, Field::Completed, Field::OwnerId]
    }

    /// Column identifier used on the wire and in filters
    pub fn column_id(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Completed => "completed",
            Field::OwnerId => "userId",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Field::Id | Field::OwnerId => ColumnKind::Integer,
            Field::Title => ColumnKind::Text,
            Field::Completed => ColumnKind::Boolean,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_id())
    }
}

impl FromStr for Field {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::all()
            .iter()
            .copied()
            .find(|field| field.column_id().eq_ignore_ascii_case(s))
            .ok_or_else(|| GridError::UnknownField(s.to_string()))
    }
}

/// Value kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Text,
    Boolean,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    pub fn kind(&self) -> ColumnKind {
        match self {
            CellValue::Integer(_) => ColumnKind::Integer,
            CellValue::Text(_) => ColumnKind::Text,
            CellValue::Boolean(_) => ColumnKind::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Parse raw text into a value of the given kind
    pub fn parse(kind: ColumnKind, raw: &str) -> Option<CellValue> {
        match kind {
            ColumnKind::Text => Some(CellValue::Text(raw.to_string())),
            ColumnKind::Integer => raw.trim().parse().ok().map(CellValue::Integer),
            ColumnKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Some(CellValue::Boolean(true)),
                "false" => Some(CellValue::Boolean(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Text(v) => write!(f, "{}", v),
            CellValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub field: Field,
    pub header: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub editable: bool,
}

impl ColumnMeta {
    pub fn new(field: Field, header: impl Into<String>) -> Self {
        Self {
            field,
            header: header.into(),
            sortable: false,
            filterable: false,
            editable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// Default column set of the todo grid
    pub fn defaults() -> Vec<ColumnMeta> {
        vec![
            ColumnMeta::new(Field::Id, "ID").sortable().filterable(),
            ColumnMeta::new(Field::Title, "Title")
                .sortable()
                .filterable()
                .editable(),
            ColumnMeta::new(Field::Completed, "Completed")
                .sortable()
                .filterable()
                .editable(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_remote_field_names() {
        let json = r#"{"userId": 1, "id": 3, "title": "fugiat veniam minus", "completed": false}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record, Record::new(3, "fugiat veniam minus", false, 1));
    }

    #[test]
    fn with_value_replaces_only_target_field() {
        let record = Record::new(2, "old", false, 7);
        let updated = record
            .with_value(Field::Title, CellValue::Text("new".into()))
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.id, 2);
        assert!(!updated.completed);
        assert_eq!(updated.owner_id, 7);
    }

    #[test]
    fn with_value_rejects_kind_mismatch_and_identity() {
        let record = Record::new(2, "old", false, 7);
        assert!(record
            .with_value(Field::Completed, CellValue::Text("yes".into()))
            .is_err());
        assert!(record.with_value(Field::Id, CellValue::Integer(9)).is_err());
    }

    #[test]
    fn field_parses_column_ids() {
        assert_eq!("userId".parse::<Field>().unwrap(), Field::OwnerId);
        assert_eq!("TITLE".parse::<Field>().unwrap(), Field::Title);
        assert!("name".parse::<Field>().is_err());
    }

    #[test]
    fn cell_value_parse_by_kind() {
        assert_eq!(
            CellValue::parse(ColumnKind::Boolean, "True"),
            Some(CellValue::Boolean(true))
        );
        assert_eq!(
            CellValue::parse(ColumnKind::Integer, " 42 "),
            Some(CellValue::Integer(42))
        );
        assert_eq!(CellValue::parse(ColumnKind::Boolean, "maybe"), None);
    }
}
