//! Record source trait and fetch plan types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{CellValue, Field, GridResult, Record};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// One column of a (possibly multi-column) sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: Field, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: Field) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: Field) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// Filter operators understood by record sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    #[default]
    Contains,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
}

impl FilterOperator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::StartsWith => "begins with",
            Self::EndsWith => "ends with",
        }
    }
}

/// A per-column filter predicate, evaluated by the record source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub operator: FilterOperator,
    pub value: CellValue,
}

impl FilterPredicate {
    pub fn new(operator: FilterOperator, value: CellValue) -> Self {
        Self { operator, value }
    }

    pub fn contains(text: impl Into<String>) -> Self {
        Self::new(FilterOperator::Contains, CellValue::Text(text.into()))
    }

    pub fn equals(value: CellValue) -> Self {
        Self::new(FilterOperator::Equals, value)
    }

    /// Evaluate the predicate against a cell.
    ///
    /// Text matching is case-insensitive. Pattern operators compare the
    /// display form, so `contains "1"` also works on integer columns.
    pub fn matches(&self, cell: &CellValue) -> bool {
        let needle = self.value.to_string().to_lowercase();
        let haystack = cell.to_string().to_lowercase();
        match self.operator {
            FilterOperator::Equals => self.equals_cell(cell, &needle, &haystack),
            FilterOperator::NotEquals => !self.equals_cell(cell, &needle, &haystack),
            FilterOperator::Contains => haystack.contains(&needle),
            FilterOperator::StartsWith => haystack.starts_with(&needle),
            FilterOperator::EndsWith => haystack.ends_with(&needle),
        }
    }

    fn equals_cell(&self, cell: &CellValue, needle: &str, haystack: &str) -> bool {
        match (&self.value, cell) {
            (CellValue::Text(_), _) | (_, CellValue::Text(_)) => needle == haystack,
            (expected, actual) => expected == actual,
        }
    }
}

/// What page, sort and filters to request from a record source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchPlan {
    pub offset: usize,
    pub size: usize,
    #[serde(default)]
    pub sort: Vec<SortCriterion>,
    #[serde(default)]
    pub filters: BTreeMap<Field, FilterPredicate>,
}

impl FetchPlan {
    pub fn new(offset: usize, size: usize) -> Self {
        Self {
            offset,
            size,
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortCriterion>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filter(mut self, field: Field, predicate: FilterPredicate) -> Self {
        self.filters.insert(field, predicate);
        self
    }

    /// Primary sort field, if any
    pub fn sort_field(&self) -> Option<Field> {
        self.sort.first().map(|criterion| criterion.field)
    }

    /// Primary sort direction, if any
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.first().map(|criterion| criterion.direction)
    }

    /// Whether a record passes every filter of this plan
    pub fn accepts(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, predicate)| predicate.matches(&record.get(*field)))
    }
}

/// A page of records plus the authoritative remote count
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub total: usize,
}

impl RecordPage {
    pub fn new(records: Vec<Record>, total: usize) -> Self {
        Self { records, total }
    }
}

/// The remote collection behind a grid
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs (e.g. "memory", "todos-api")
    fn name(&self) -> &str;

    /// Fetch one page.
    ///
    /// `total` in the returned page is the remote count after filters. The
    /// number of returned records does not have to match `total - offset`.
    async fn fetch(&self, plan: &FetchPlan) -> GridResult<RecordPage>;
}
