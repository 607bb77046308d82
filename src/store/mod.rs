//! The board store: owner of the canonical master sequence.
//!
//! Mutating methods take `&mut self`, so all edits to one board are
//! serialized by ownership. Each successful edit is applied in memory first
//! and then handed to the save worker; a failed save never rolls anything
//! back.

mod persist;

pub use persist::{SaveOutcome, SaveReport};

use crate::{
    config::StoreConfig,
    domain::{
        drag::{self, DragEvent, DragOutcome},
        view::{self, ColumnView, SortOrder, ViewQuery},
        BoardConfig, BoardState, Task, TaskId, TaskStatus,
    },
    error::Result,
    storage::{LoadStatus, PersistenceAdapter, Storage},
};
use persist::SaveQueue;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct BoardStore {
    state: BoardState,
    config: BoardConfig,
    query: ViewQuery,
    load_status: LoadStatus,
    saves: Option<SaveQueue>,
}

impl BoardStore {
    /// Hydrates a board from storage and starts its save worker.
    ///
    /// Must run inside a tokio runtime.
    pub async fn open(adapter: PersistenceAdapter, config: BoardConfig) -> Self {
        let loaded = adapter.load().await;
        info!(
            board = %config.name,
            tasks = loaded.state.len(),
            status = ?loaded.status,
            "Opened board"
        );

        let saves = SaveQueue::spawn(adapter, &loaded.state);
        Self {
            state: loaded.state,
            config,
            query: ViewQuery::default(),
            load_status: loaded.status,
            saves: Some(saves),
        }
    }

    /// Opens the file-backed board described by `config`
    pub async fn from_config(config: &StoreConfig) -> Self {
        let storage = config.file_storage();
        if let Err(e) = storage.initialize().await {
            warn!(error = %e, "Could not initialize board storage");
        }

        let adapter = PersistenceAdapter::new(Arc::new(storage));
        let mut store = Self::open(adapter, BoardConfig::default()).await;
        store.set_sort_order(config.sort);
        store
    }

    /// A session-only board that never persists
    pub fn detached(state: BoardState) -> Self {
        Self {
            state,
            config: BoardConfig::default(),
            query: ViewQuery::default(),
            load_status: LoadStatus::Missing,
            saves: None,
        }
    }

    pub fn with_board_config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn board_config(&self) -> &BoardConfig {
        &self.config
    }

    /// How the initial snapshot load went
    pub fn last_load(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.state.get(id.as_str())
    }

    /// Adds a task at the end of the master sequence
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
    ) -> Result<TaskId> {
        let task = Task::new(title, description, status)?;
        let id = task.id().clone();
        debug!(task = %id, status = status.as_str(), "Adding task");

        self.state.push(task);
        self.persist();
        Ok(id)
    }

    /// Deletes a task. Unknown ids are ignored and return `false`.
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        if self.state.remove(id).is_none() {
            debug!(task = %id, "Ignoring delete of unknown task");
            return false;
        }

        debug!(task = %id, "Deleted task");
        self.persist();
        true
    }

    /// Applies a drop of `active_id` onto a task id or column identifier
    pub fn apply_drag(&mut self, active_id: &str, over_id: Option<&str>) -> DragOutcome {
        self.apply_drag_event(&DragEvent::new(active_id, over_id))
    }

    pub fn apply_drag_event(&mut self, event: &DragEvent) -> DragOutcome {
        let outcome = drag::apply_drag(&mut self.state, event);
        match &outcome {
            DragOutcome::Ignored(reason) => {
                debug!(active = %event.active_id, ?reason, "Ignoring drop");
            }
            changed => {
                debug!(outcome = ?changed, "Applied drop");
                self.persist();
            }
        }
        outcome
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.search = text.into();
    }

    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.query.sort = order;
    }

    pub fn sort_order(&self) -> SortOrder {
        self.query.sort
    }

    /// Filtered, sorted tasks of one column under the current criteria
    pub fn column_view(&self, status: TaskStatus) -> ColumnView {
        view::column_view(&self.state, status, self.config.label(status), &self.query)
    }

    /// Every column, in display order
    pub fn board_view(&self) -> Vec<ColumnView> {
        view::board_view(&self.state, &self.config, &self.query)
    }

    /// Result of the most recent save attempt
    pub fn last_save(&self) -> Option<SaveReport> {
        self.saves.as_ref().map(SaveQueue::last_report)
    }

    /// Waits until the current state has been handed to storage.
    /// Returns `None` for detached boards.
    pub async fn flush(&self) -> Option<SaveReport> {
        match &self.saves {
            Some(saves) => Some(saves.flush().await),
            None => None,
        }
    }

    /// Writes any pending state and stops the save worker
    pub async fn close(mut self) -> Option<SaveReport> {
        match self.saves.take() {
            Some(saves) => Some(saves.close().await),
            None => None,
        }
    }

    fn persist(&mut self) {
        if let Some(saves) = self.saves.as_mut() {
            let generation = saves.enqueue(&self.state);
            debug!(generation, "Queued board save");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::drag::IgnoreReason,
        storage::{decode_snapshot, FileStorage, MemoryStorage},
    };
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use tempfile::TempDir;

    async fn memory_store() -> (BoardStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = BoardStore::open(
            PersistenceAdapter::new(storage.clone()),
            BoardConfig::default(),
        )
        .await;
        (store, storage)
    }

    fn todo_titles(store: &BoardStore) -> Vec<&str> {
        store
            .state()
            .column(TaskStatus::Todo)
            .map(Task::title)
            .collect()
    }

    #[tokio::test]
    async fn test_add_task_appears_in_its_column() {
        let (mut store, _) = memory_store().await;
        let mut seen = HashSet::new();

        for (title, status) in [
            ("Plan", TaskStatus::Todo),
            ("Build", TaskStatus::InProgress),
            ("Ship", TaskStatus::Done),
        ] {
            let id = store.add_task(title, "details", status).unwrap();
            assert!(seen.insert(id.clone()));

            let view = store.column_view(status);
            let matching: Vec<_> = view.tasks.iter().filter(|t| t.id() == &id).collect();
            assert_eq!(matching.len(), 1);
            assert_eq!(matching[0].title(), title);
            assert_eq!(matching[0].description(), "details");
            assert_eq!(matching[0].status(), status);
        }
    }

    #[tokio::test]
    async fn test_add_task_with_empty_title_changes_nothing() {
        let (mut store, storage) = memory_store().await;

        assert!(store.add_task("", "desc", TaskStatus::Todo).is_err());
        assert!(store.state().is_empty());

        store.flush().await;
        assert_eq!(storage.current().await, None);
    }

    #[tokio::test]
    async fn test_delete_twice_is_idempotent() {
        let (mut store, _) = memory_store().await;
        let keep = store.add_task("Keep", "", TaskStatus::Todo).unwrap();
        let gone = store.add_task("Drop", "", TaskStatus::Todo).unwrap();

        assert!(store.delete_task(&gone));
        let after_first = store.state().clone();
        let saved = store.flush().await.unwrap();
        assert!(!store.delete_task(&gone));

        assert_eq!(store.state(), &after_first);
        assert_eq!(store.flush().await.unwrap().generation, saved.generation);
        assert!(store.task(&keep).is_some());
        assert!(store.task(&gone).is_none());
    }

    #[tokio::test]
    async fn test_whitespace_title_is_kept() {
        let (mut store, storage) = memory_store().await;

        let id = store.add_task(" ", "", TaskStatus::Todo).unwrap();
        assert_eq!(store.task(&id).unwrap().title(), " ");

        store.flush().await;
        let saved = decode_snapshot(&storage.current().await.unwrap()).unwrap();
        assert_eq!(&saved, store.state());
    }

    #[tokio::test]
    async fn test_intra_column_drag_relocates() {
        let (mut store, _) = memory_store().await;
        let a = store.add_task("A", "", TaskStatus::Todo).unwrap();
        store.add_task("B", "", TaskStatus::Todo).unwrap();
        let c = store.add_task("C", "", TaskStatus::Todo).unwrap();
        store.add_task("Elsewhere", "", TaskStatus::InProgress).unwrap();
        let other_columns: Vec<_> = store
            .state()
            .iter()
            .filter(|t| t.status() != TaskStatus::Todo)
            .cloned()
            .collect();

        let outcome = store.apply_drag(a.as_str(), Some(c.as_str()));

        assert!(outcome.changed());
        assert_eq!(todo_titles(&store), vec!["B", "C", "A"]);
        store.set_sort_order(SortOrder::Manual);
        assert_eq!(store.column_view(TaskStatus::Todo).titles(), vec!["B", "C", "A"]);
        let still_other: Vec<_> = store
            .state()
            .iter()
            .filter(|t| t.status() != TaskStatus::Todo)
            .cloned()
            .collect();
        assert_eq!(still_other, other_columns);
    }

    #[tokio::test]
    async fn test_cross_column_drag_to_bare_column() {
        let (mut store, _) = memory_store().await;
        let a = store.add_task("A", "", TaskStatus::Todo).unwrap();

        store.apply_drag(a.as_str(), Some("done"));

        assert_eq!(store.task(&a).unwrap().status(), TaskStatus::Done);
        assert!(store.column_view(TaskStatus::Todo).is_empty());
        assert_eq!(store.column_view(TaskStatus::Done).titles(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_ignored_drags_do_not_save() {
        let (mut store, storage) = memory_store().await;
        let a = store.add_task("A", "", TaskStatus::Todo).unwrap();
        let report = store.flush().await.unwrap();
        let saved = storage.current().await;
        let before = serde_json::to_string(store.state()).unwrap();

        assert_eq!(
            store.apply_drag("unknown", Some(a.as_str())),
            DragOutcome::Ignored(IgnoreReason::UnknownActive)
        );
        assert_eq!(
            store.apply_drag(a.as_str(), None),
            DragOutcome::Ignored(IgnoreReason::NoTarget)
        );

        assert_eq!(serde_json::to_string(store.state()).unwrap(), before);
        assert_eq!(store.flush().await.unwrap().generation, report.generation);
        assert_eq!(storage.current().await, saved);
    }

    #[test]
    fn test_search_and_sort_views() {
        let mut state = BoardState::new();
        let alpha = Utc.timestamp_opt(1, 0).unwrap();
        let beta = Utc.timestamp_opt(2, 0).unwrap();
        state.push(Task::with_timestamp("Alpha", "", TaskStatus::Todo, alpha).unwrap());
        state.push(Task::with_timestamp("beta", "", TaskStatus::Todo, beta).unwrap());
        let mut store = BoardStore::detached(state);

        store.set_search("AL");
        assert_eq!(store.search(), "AL");
        assert_eq!(store.column_view(TaskStatus::Todo).titles(), vec!["Alpha"]);

        store.set_search("");
        store.set_sort_order(SortOrder::Recent);
        assert_eq!(store.column_view(TaskStatus::Todo).titles(), vec!["beta", "Alpha"]);

        store.set_sort_order(SortOrder::Oldest);
        assert_eq!(store.column_view(TaskStatus::Todo).titles(), vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_board_view_reports_counts_and_labels() {
        let mut store = BoardStore::detached(BoardState::new());
        store.add_task("One", "", TaskStatus::InProgress).unwrap();

        let views = store.board_view();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].name, "To do");
        assert!(views[0].is_empty());
        assert_eq!(views[1].count(), 1);
        assert_eq!(store.last_save(), None);
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..StoreConfig::default()
        };

        let mut store = BoardStore::from_config(&config).await;
        assert_eq!(store.last_load(), &LoadStatus::Missing);
        let a = store.add_task("A", "first", TaskStatus::Todo).unwrap();
        let b = store.add_task("B", "", TaskStatus::Todo).unwrap();
        store.apply_drag(b.as_str(), Some(a.as_str()));
        store.apply_drag(a.as_str(), Some("in-progress"));
        let expected = store.state().clone();
        let report = store.close().await.unwrap();
        assert_eq!(report.outcome, SaveOutcome::Saved);

        let reopened = BoardStore::from_config(&config).await;
        assert_eq!(reopened.last_load(), &LoadStatus::Restored(2));
        assert_eq!(reopened.state(), &expected);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_opens_empty_board() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "tasks");
        storage.write_snapshot("{ definitely not a task list").await.unwrap();

        let mut store =
            BoardStore::open(PersistenceAdapter::new(Arc::new(storage)), BoardConfig::default())
                .await;
        assert!(matches!(store.last_load(), LoadStatus::Corrupt(_)));
        assert!(store.state().is_empty());

        store.add_task("Fresh start", "", TaskStatus::Todo).unwrap();
        assert_eq!(store.flush().await.unwrap().outcome, SaveOutcome::Saved);
    }

    #[tokio::test]
    async fn test_unavailable_storage_keeps_board_usable() {
        let storage = Arc::new(MemoryStorage::failing());
        let mut store =
            BoardStore::open(PersistenceAdapter::new(storage), BoardConfig::default()).await;
        assert!(store.last_load().is_degraded());

        let id = store.add_task("Session only", "", TaskStatus::Todo).unwrap();
        let report = store.flush().await.unwrap();
        assert!(matches!(report.outcome, SaveOutcome::Failed(_)));

        store.apply_drag(id.as_str(), Some("done"));
        assert_eq!(store.column_view(TaskStatus::Done).count(), 1);
        assert!(matches!(
            store.flush().await.unwrap().outcome,
            SaveOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_saved_snapshot_matches_memory() {
        let (mut store, storage) = memory_store().await;
        for i in 0..20 {
            store.add_task(format!("Task {i}"), "", TaskStatus::Todo).unwrap();
        }

        store.flush().await;
        let saved = decode_snapshot(&storage.current().await.unwrap()).unwrap();
        assert_eq!(&saved, store.state());
    }
}
