//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use lazygrid_core::{
    CollectingSink, FetchPlan, GridError, GridResult, MemorySource, NotificationSink, Record,
    RecordPage, RecordSource,
};
use lazygrid_interchange::{Clock, Exporter};
use lazygrid_table::{GridConfig, GridController};

/// Mock record source for testing grid logic without a remote collection.
///
/// Paging, sorting and filtering are evaluated like a server would; every
/// requested plan is logged so tests can assert what was sent.
pub struct MockSource {
    pub name: String,
    records: Mutex<Vec<Record>>,
    should_fail: Mutex<bool>,
    /// Log of all plans fetched, for assertion in tests
    pub fetch_log: Arc<Mutex<Vec<FetchPlan>>>,
}

impl MockSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            name: "mock".to_string(),
            records: Mutex::new(records),
            should_fail: Mutex::new(false),
            fetch_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure(self) -> Self {
        *self.should_fail.lock() = true;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        *self.should_fail.lock() = failing;
    }

    /// Replace the remote collection
    pub fn set_records(&self, records: Vec<Record>) {
        *self.records.lock() = records;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_log.lock().len()
    }

    pub fn fetch_log(&self) -> Vec<FetchPlan> {
        self.fetch_log.lock().clone()
    }

    pub fn last_plan(&self) -> Option<FetchPlan> {
        self.fetch_log.lock().last().cloned()
    }
}

#[async_trait]
impl RecordSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, plan: &FetchPlan) -> GridResult<RecordPage> {
        self.fetch_log.lock().push(plan.clone());

        if *self.should_fail.lock() {
            return Err(GridError::Fetch("Fetch failed".into()));
        }

        let records = self.records.lock().clone();
        MemorySource::new(self.name.clone(), records).fetch(plan).await
    }
}

/// `count` todo records with ids starting at 1
pub fn todos(count: i64) -> Vec<Record> {
    (1..=count)
        .map(|id| Record::new(id, format!("todo {}", id), id % 3 == 0, (id - 1) / 20 + 1))
        .collect()
}

pub fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

pub fn fixed_clock() -> Clock {
    Arc::new(|| 1_700_000_000_000)
}

pub struct Harness {
    pub source: Arc<MockSource>,
    pub sink: Arc<CollectingSink>,
    pub grid: GridController<MockSource>,
}

pub fn harness(source: MockSource) -> Harness {
    harness_with(source, GridConfig::default())
}

pub fn harness_with(source: MockSource, config: GridConfig) -> Harness {
    harness_with_exporter(source, config, Exporter::new("todos").with_clock(fixed_clock()))
}

pub fn harness_with_exporter(
    source: MockSource,
    config: GridConfig,
    exporter: Exporter,
) -> Harness {
    let source = Arc::new(source);
    let sink = Arc::new(CollectingSink::new());
    let grid = GridController::new(
        source.clone(),
        sink.clone() as Arc<dyn NotificationSink>,
        exporter,
        &config,
    )
    .expect("default config is valid");
    Harness { source, sink, grid }
}
