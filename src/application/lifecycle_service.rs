// Active/archived lists for sessions and products
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::lifecycle::{LifecycleRecord, RecordKind, RecordState};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordListView {
    pub kind: RecordKind,
    pub list: RecordState,
    pub rows: Vec<LifecycleRecord>,
}

/// Drives archive, restore and comment edits for one record kind.
///
/// Every successful transition re-fetches the list being viewed. A list
/// response is dropped if the operator switched lists while it was in flight,
/// so rows never show records from the other list.
pub struct RecordLifecycleController {
    kind: RecordKind,
    repository: Arc<dyn SprayLineRepository>,
    view: watch::Sender<RecordListView>,
}

impl RecordLifecycleController {
    pub fn new(kind: RecordKind, repository: Arc<dyn SprayLineRepository>) -> Self {
        let (view, _) = watch::channel(RecordListView {
            kind,
            list: RecordState::Active,
            rows: Vec::new(),
        });
        Self { kind, repository, view }
    }

    pub fn snapshot(&self) -> RecordListView {
        self.view.borrow().clone()
    }

    /// Fetch whichever list is selected.
    pub async fn open(&self) -> RecordListView {
        self.refresh().await;
        self.snapshot()
    }

    /// Switch lists. Previously displayed rows are discarded before the fetch.
    pub async fn select_list(&self, list: RecordState) -> RecordListView {
        self.view.send_modify(|view| {
            view.list = list;
            view.rows.clear();
        });
        tracing::debug!(kind = %self.kind, %list, "List selected");
        self.refresh().await;
        self.snapshot()
    }

    pub async fn archive(&self, id: u64) -> RecordListView {
        let outcome = self.repository.archive_record(self.kind, id).await;
        self.after_transition(self.kind.archive_verb(), id, outcome).await
    }

    pub async fn restore(&self, id: u64) -> RecordListView {
        let outcome = self.repository.restore_record(self.kind, id).await;
        self.after_transition("restore", id, outcome).await
    }

    /// Comments are edited from the active list only.
    pub async fn set_comment(&self, id: u64, comments: &str) -> RecordListView {
        if self.view.borrow().list != RecordState::Active {
            tracing::warn!(kind = %self.kind, id, "Comment edit ignored outside the active list");
            return self.snapshot();
        }

        let outcome = self.repository.set_record_comment(self.kind, id, comments).await;
        self.after_transition("comment", id, outcome).await
    }

    async fn after_transition(&self, action: &str, id: u64, outcome: anyhow::Result<()>) -> RecordListView {
        match outcome {
            Ok(()) => {
                tracing::info!(kind = %self.kind, id, action, "Record updated");
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, id, action, error = %e, "Record update failed");
            }
        }
        self.snapshot()
    }

    async fn refresh(&self) {
        let requested = self.view.borrow().list;
        match self.repository.list_records(self.kind, requested).await {
            Ok(rows) => {
                let applied = self.view.send_if_modified(|view| {
                    if view.list != requested {
                        return false;
                    }
                    view.rows = rows;
                    true
                });
                if !applied {
                    tracing::debug!(kind = %self.kind, list = %requested, "Discarding rows for a list no longer viewed");
                }
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, list = %requested, error = %e, "Record list fetch failed, keeping rows");
            }
        }
    }
}
