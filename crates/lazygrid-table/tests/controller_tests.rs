//! Integration tests for GridController
//!
//! Drives the controller against MockSource and checks what is fetched,
//! what the grid shows and what is notified.

mod common;

use pretty_assertions::assert_eq;

use lazygrid_core::{
    CellValue, Field, FilterPredicate, NotificationSeverity, SortCriterion,
};
use lazygrid_interchange::{ExportKind, Exporter};
use lazygrid_table::{GridConfig, GridIntent, LoadStatus, SelectionMode, TableDensity};

use common::{fixed_clock, harness, harness_with_exporter, ids, todos, MockSource};

// ============ pagination ============

#[tokio::test]
async fn load_shows_first_page() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;

    let state = h.grid.state();
    assert_eq!(ids(state.rows()), (1..=10).collect::<Vec<_>>());
    assert_eq!(state.window().total(), 200);
    assert_eq!(state.status(), &LoadStatus::Idle);
    assert_eq!(state.status_text(), "10 records in page 1 of 20 (200 total)");
}

#[tokio::test]
async fn page_change_settles_on_requested_window() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;
    h.grid
        .handle(GridIntent::PageChanged {
            offset: 20,
            size: 10,
        })
        .await;

    let state = h.grid.state();
    assert_eq!(state.window().offset(), 20);
    assert_eq!(state.window().size(), 10);
    assert_eq!(ids(state.rows()), (21..=30).collect::<Vec<_>>());
    assert_eq!(h.source.last_plan().map(|p| p.offset), Some(20));
}

#[tokio::test]
async fn last_response_wins_when_completions_arrive_out_of_order() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;

    let first = h.grid.dispatch(GridIntent::PageChanged {
        offset: 20,
        size: 10,
    });
    let second = h.grid.dispatch(GridIntent::PageChanged {
        offset: 30,
        size: 10,
    });
    let (first, second) = (first[0].clone(), second[0].clone());

    let latest = h.grid.fetch(&second).await;
    h.grid.complete(second.seq, latest);
    let stale = h.grid.fetch(&first).await;
    h.grid.complete(first.seq, stale);

    let state = h.grid.state();
    assert_eq!(state.window().offset(), 30);
    assert_eq!(ids(state.rows()), (31..=40).collect::<Vec<_>>());
}

#[tokio::test]
async fn identical_request_is_not_refetched_while_in_flight() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;

    let first = h.grid.dispatch(GridIntent::NextPage);
    let second = h.grid.dispatch(GridIntent::PageChanged {
        offset: 10,
        size: 10,
    });
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[tokio::test]
async fn shrinking_collection_settles_on_last_page() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;

    h.source.set_records(todos(42));
    h.grid
        .handle(GridIntent::PageChanged {
            offset: 190,
            size: 10,
        })
        .await;

    let state = h.grid.state();
    assert_eq!(state.window().offset(), 40);
    assert_eq!(state.window().total(), 42);
    assert_eq!(ids(state.rows()), vec![41, 42]);
    let offsets: Vec<usize> = h.source.fetch_log().iter().map(|p| p.offset).collect();
    assert_eq!(offsets, vec![0, 190, 40]);
}

#[tokio::test]
async fn invalid_page_size_is_reported_without_fetching() {
    let mut h = harness(MockSource::new(todos(50)));
    h.grid.handle(GridIntent::Load).await;
    let before = h.source.fetch_count();

    h.grid
        .handle(GridIntent::PageChanged { offset: 0, size: 7 })
        .await;

    assert_eq!(h.source.fetch_count(), before);
    let notes = h.sink.take();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, NotificationSeverity::Warn);
}

// ============ fetch failure ============

#[tokio::test]
async fn failed_fetch_keeps_previous_rows() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;
    h.source.set_failing(true);

    h.grid.handle(GridIntent::NextPage).await;

    let state = h.grid.state();
    assert_eq!(ids(state.rows()), (1..=10).collect::<Vec<_>>());
    assert_eq!(state.window().offset(), 0);
    assert!(matches!(state.status(), LoadStatus::Failed { .. }));

    let warnings: Vec<_> = h
        .sink
        .take()
        .into_iter()
        .filter(|n| n.severity == NotificationSeverity::Warn)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(h.source.fetch_count(), 2);
}

#[tokio::test]
async fn retry_after_failure_recovers() {
    let mut h = harness(MockSource::new(todos(30)).with_failure());
    h.grid.handle(GridIntent::Load).await;
    assert!(h.grid.state().rows().is_empty());

    h.source.set_failing(false);
    h.grid.handle(GridIntent::Load).await;
    assert_eq!(h.grid.state().rows().len(), 10);
    assert_eq!(h.grid.state().status(), &LoadStatus::Idle);
}

// ============ sort, filter, columns ============

#[tokio::test]
async fn sort_is_evaluated_by_the_source() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;
    h.grid.handle(GridIntent::NextPage).await;

    h.grid
        .handle(GridIntent::SortChanged(vec![SortCriterion::descending(Field::Id)]))
        .await;

    let state = h.grid.state();
    assert_eq!(state.window().offset(), 0);
    assert_eq!(ids(state.rows()), (191..=200).rev().collect::<Vec<_>>());
    let plan = h.source.last_plan().unwrap();
    assert_eq!(plan.sort, vec![SortCriterion::descending(Field::Id)]);
}

#[tokio::test]
async fn filter_total_comes_from_source() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;

    h.grid
        .handle(GridIntent::FilterChanged {
            field: Field::Completed,
            predicate: Some(FilterPredicate::equals(CellValue::Boolean(true))),
        })
        .await;

    let state = h.grid.state();
    assert_eq!(state.window().total(), 66);
    assert!(state.rows().iter().all(|r| r.completed));

    h.grid.handle(GridIntent::ClearFilters).await;
    assert_eq!(h.grid.state().window().total(), 200);
}

#[tokio::test]
async fn column_visibility_and_density_never_fetch() {
    let mut h = harness(MockSource::new(todos(20)));
    h.grid.handle(GridIntent::Load).await;
    let before = h.source.fetch_count();

    h.grid
        .handle(GridIntent::VisibleColumnsChanged(vec![Field::Title]))
        .await;
    h.grid
        .handle(GridIntent::DensityChanged(TableDensity::Small))
        .await;

    assert_eq!(h.source.fetch_count(), before);
    let state = h.grid.state();
    assert_eq!(state.visible_columns().len(), 1);
    assert_eq!(state.density(), TableDensity::Small);
    assert_eq!(state.rows().len(), 10);
}

// ============ pinning ============

#[tokio::test]
async fn pinned_rows_stay_across_pages_and_return_sorted() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;

    for (record_id, position) in [(5, 4), (2, 1), (8, 5)] {
        h.grid
            .handle(GridIntent::TogglePin {
                record_id,
                pinned: false,
                position,
            })
            .await;
    }
    let state = h.grid.state();
    assert_eq!(ids(state.pinned()), vec![5, 2]);
    assert_eq!(ids(state.rows()), vec![1, 3, 4, 6, 7, 8, 9, 10]);

    h.grid
        .handle(GridIntent::TogglePin {
            record_id: 5,
            pinned: true,
            position: 0,
        })
        .await;
    assert_eq!(ids(h.grid.state().rows()), vec![1, 3, 4, 5, 6, 7, 8, 9, 10]);

    h.grid.handle(GridIntent::NextPage).await;
    h.grid.handle(GridIntent::PrevPage).await;
    let state = h.grid.state();
    assert_eq!(ids(state.pinned()), vec![2]);
    assert!(!state.rows().iter().any(|r| r.id == 2));
}

// ============ editing ============

#[tokio::test]
async fn edit_commit_changes_only_edited_row() {
    let mut h = harness(MockSource::new(todos(20)));
    h.grid.handle(GridIntent::Load).await;
    let before = h.grid.state().rows().to_vec();

    h.grid
        .handle(GridIntent::BeginEdit {
            row: 3,
            field: Field::Title,
        })
        .await;
    h.grid
        .handle(GridIntent::EditDraft(CellValue::Text("renamed".into())))
        .await;
    h.grid.handle(GridIntent::CommitEdit).await;

    let after = h.grid.state().rows();
    assert_eq!(after[3].title, "renamed");
    assert_eq!(after[3].completed, before[3].completed);
    for index in (0..after.len()).filter(|i| *i != 3) {
        assert_eq!(after[index], before[index]);
    }
    assert!(!h.grid.state().edit().is_editing());
}

#[tokio::test]
async fn only_one_row_is_edited_at_a_time() {
    let mut h = harness(MockSource::new(todos(20)));
    h.grid.handle(GridIntent::Load).await;

    h.grid
        .handle(GridIntent::BeginEdit {
            row: 0,
            field: Field::Title,
        })
        .await;
    h.grid
        .handle(GridIntent::EditDraft(CellValue::Text("draft".into())))
        .await;
    h.grid
        .handle(GridIntent::BeginEdit {
            row: 1,
            field: Field::Title,
        })
        .await;
    h.grid.handle(GridIntent::CommitEdit).await;

    let rows = h.grid.state().rows();
    assert_eq!(rows[0].title, "todo 1");
    assert_eq!(rows[1].title, "todo 2");
}

// ============ selection and export ============

#[tokio::test]
async fn selection_survives_page_changes() {
    let mut h = harness(MockSource::new(todos(40)));
    h.grid.handle(GridIntent::Load).await;
    h.grid
        .handle(GridIntent::SelectionModeChanged(SelectionMode::Checkbox))
        .await;
    h.grid
        .handle(GridIntent::SelectionChanged(vec![3, 4]))
        .await;

    h.grid.handle(GridIntent::NextPage).await;
    let state = h.grid.state();
    assert_eq!(state.selection().len(), 2);
    assert!(state.selected_rows().is_empty());

    h.grid.handle(GridIntent::PrevPage).await;
    assert_eq!(ids(&h.grid.state().selected_rows()), vec![3, 4]);

    let summaries: Vec<String> = h.sink.take().into_iter().map(|n| n.summary).collect();
    assert_eq!(summaries, vec!["Record Selected", "Record Selected"]);
}

#[tokio::test]
async fn selection_only_export_with_nothing_selected_is_empty() {
    let mut h = harness(MockSource::new(todos(40)));
    h.grid.handle(GridIntent::Load).await;

    h.grid
        .handle(GridIntent::ExportRequested {
            kind: ExportKind::Csv,
            selection_only: true,
        })
        .await;

    let artifacts = h.grid.take_artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].row_count, 0);
    assert_eq!(artifacts[0].file_name, "todos_export_1700000000000.csv");
    assert_eq!(
        String::from_utf8(artifacts[0].bytes.clone()).unwrap(),
        "ID,Title,Completed\n"
    );
}

#[tokio::test]
async fn export_covers_loaded_rows_only() {
    let mut h = harness(MockSource::new(todos(200)));
    h.grid.handle(GridIntent::Load).await;
    h.grid
        .handle(GridIntent::TogglePin {
            record_id: 4,
            pinned: false,
            position: 3,
        })
        .await;
    let fetched = h.source.fetch_count();

    h.grid
        .handle(GridIntent::ExportRequested {
            kind: ExportKind::Csv,
            selection_only: false,
        })
        .await;

    assert_eq!(h.source.fetch_count(), fetched);
    let artifact = h.grid.take_artifacts().remove(0);
    assert_eq!(artifact.row_count, 10);
    let text = String::from_utf8(artifact.bytes).unwrap();
    let first_data_line = text.lines().nth(1).unwrap();
    assert_eq!(first_data_line, "4,todo 4,false");
}

#[tokio::test]
async fn pdf_export_renders_document() {
    let mut h = harness(MockSource::new(todos(20)));
    h.grid.handle(GridIntent::Load).await;
    h.sink.take();

    h.grid
        .handle(GridIntent::ExportRequested {
            kind: ExportKind::Pdf,
            selection_only: false,
        })
        .await;

    let artifacts = h.grid.take_artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].file_name, "todos_export_1700000000000.pdf");
    assert_eq!(artifacts[0].row_count, 10);
    assert!(artifacts[0].bytes.starts_with(b"%PDF"));
    let notes = h.sink.take();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].summary, "Export Complete");
    assert_eq!(notes[0].severity, NotificationSeverity::Info);
}

#[tokio::test]
async fn unavailable_export_format_warns_and_keeps_state() {
    let mut h = harness_with_exporter(
        MockSource::new(todos(20)),
        GridConfig::default(),
        Exporter::empty("todos").with_clock(fixed_clock()),
    );
    h.grid.handle(GridIntent::Load).await;
    let before = h.grid.state().clone();
    h.sink.take();

    h.grid
        .handle(GridIntent::ExportRequested {
            kind: ExportKind::Pdf,
            selection_only: false,
        })
        .await;

    assert!(h.grid.take_artifacts().is_empty());
    assert_eq!(h.grid.state(), &before);
    let notes = h.sink.take();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].summary, "Export Failed");
    assert_eq!(notes[0].severity, NotificationSeverity::Warn);
}
