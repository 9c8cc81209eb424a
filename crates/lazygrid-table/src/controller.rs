//! Grid controller
//!
//! Owns the current [`GridViewState`] and runs the effects produced by the
//! reducer: fetches against a [`RecordSource`], toasts through a
//! [`NotificationSink`] and exports through an [`Exporter`].

use std::collections::VecDeque;
use std::sync::Arc;

use lazygrid_core::{GridResult, Notification, NotificationSink, RecordPage, RecordSource};
use lazygrid_interchange::{ExportArtifact, Exporter};

use crate::intent::{Effect, ExportJob, FetchTicket, GridIntent};
use crate::reducer::reduce;
use crate::view_state::{GridConfig, GridViewState};

pub struct GridController<S: RecordSource + ?Sized = dyn RecordSource> {
    source: Arc<S>,
    sink: Arc<dyn NotificationSink>,
    exporter: Exporter,
    state: GridViewState,
    artifacts: Vec<ExportArtifact>,
}

impl<S: RecordSource + ?Sized> GridController<S> {
    pub fn new(
        source: Arc<S>,
        sink: Arc<dyn NotificationSink>,
        exporter: Exporter,
        config: &GridConfig,
    ) -> GridResult<Self> {
        Ok(Self {
            source,
            sink,
            exporter,
            state: GridViewState::new(config)?,
            artifacts: Vec::new(),
        })
    }

    pub fn state(&self) -> &GridViewState {
        &self.state
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Artifacts produced since the last call
    pub fn take_artifacts(&mut self) -> Vec<ExportArtifact> {
        std::mem::take(&mut self.artifacts)
    }

    /// Reduce `intent`, run its side effects and return the fetches to run
    pub fn dispatch(&mut self, intent: GridIntent) -> Vec<FetchTicket> {
        tracing::trace!(intent = intent.name(), "dispatch");
        let transition = reduce(&self.state, intent);
        self.state = transition.state;

        let mut tickets = Vec::new();
        for effect in transition.effects {
            match effect {
                Effect::Fetch(ticket) => tickets.push(ticket),
                Effect::Notify(notification) => self.sink.notify(notification),
                Effect::Export(job) => self.run_export(job),
            }
        }
        tickets
    }

    /// Feed the result of a fetch back into the grid
    pub fn complete(&mut self, seq: u64, result: GridResult<RecordPage>) -> Vec<FetchTicket> {
        self.dispatch(GridIntent::FetchCompleted { seq, result })
    }

    /// Run one fetch against the source
    pub async fn fetch(&self, ticket: &FetchTicket) -> GridResult<RecordPage> {
        self.source.fetch(&ticket.plan).await
    }

    /// Dispatch `intent` and drive every fetch it causes to completion
    #[tracing::instrument(skip(self, intent), fields(intent = intent.name(), source = self.source.name()))]
    pub async fn handle(&mut self, intent: GridIntent) {
        let mut pending: VecDeque<FetchTicket> = self.dispatch(intent).into();
        while let Some(ticket) = pending.pop_front() {
            let result = self.fetch(&ticket).await;
            pending.extend(self.complete(ticket.seq, result));
        }
    }

    fn run_export(&mut self, job: ExportJob) {
        match self.exporter.export(job.kind, &job.rows, &job.columns) {
            Ok(artifact) => {
                self.sink.notify(
                    Notification::info(
                        "Export Complete",
                        format!("{} ({} records)", artifact.file_name, artifact.row_count),
                    )
                    .with_ttl(self.state.notification_ttl()),
                );
                self.artifacts.push(artifact);
            }
            Err(e) => {
                tracing::warn!(kind = %job.kind, error = %e, "export failed");
                self.sink.notify(
                    Notification::warn("Export Failed", e.to_string())
                        .with_ttl(self.state.notification_ttl()),
                );
            }
        }
    }
}
