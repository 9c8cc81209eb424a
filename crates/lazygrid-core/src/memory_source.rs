//! In-process record source
//!
//! Evaluates filters, sorting and paging over an owned record list the same
//! way a remote collection would, so the grid never has to do it locally.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::path::Path;

use crate::{
    CellValue, FetchPlan, GridResult, Record, RecordPage, RecordSource, SortCriterion,
    SortDirection,
};

pub struct MemorySource {
    name: String,
    records: Vec<Record>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// Parse a JSON array of records in the remote shape
    pub fn from_json_str(name: impl Into<String>, json: &str) -> GridResult<Self> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Ok(Self::new(name, records))
    }

    pub fn from_json_file(name: impl Into<String>, path: &Path) -> GridResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(name, &content)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Compare two records by the given criteria, falling back to id order
pub fn compare_records(sort: &[SortCriterion], a: &Record, b: &Record) -> Ordering {
    for criterion in sort {
        let (left, right) = (a.get(criterion.field), b.get(criterion.field));
        let ordering = match (&left, &right) {
            (CellValue::Integer(l), CellValue::Integer(r)) => l.cmp(r),
            (CellValue::Boolean(l), CellValue::Boolean(r)) => l.cmp(r),
            _ => left.to_string().cmp(&right.to_string()),
        };
        let ordering = match criterion.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id.cmp(&b.id)
}

#[async_trait]
impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip(self), fields(source = %self.name))]
    async fn fetch(&self, plan: &FetchPlan) -> GridResult<RecordPage> {
        let mut matching: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| plan.accepts(record))
            .collect();

        if !plan.sort.is_empty() {
            matching.sort_by(|a, b| compare_records(&plan.sort, a, b));
        }

        let total = matching.len();
        let records: Vec<Record> = matching
            .into_iter()
            .skip(plan.offset)
            .take(plan.size)
            .cloned()
            .collect();

        tracing::debug!(
            offset = plan.offset,
            size = plan.size,
            returned = records.len(),
            total,
            "memory source page evaluated"
        );

        Ok(RecordPage::new(records, total))
    }
}
