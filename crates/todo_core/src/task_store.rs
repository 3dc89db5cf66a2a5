use crate::error::AppError;
use crate::model::Task;
use crate::storage::KeyValueStorage;
use tracing::{debug, error, warn};

/// Storage key holding the serialized task list.
pub const TODOS_KEY: &str = "todos";

/// Ordered task list mirrored to a single storage slot.
///
/// Every mutation rewrites the whole list to the slot. Write failures are
/// logged and absorbed; the in-memory state is authoritative.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStorage> {
    storage: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Opens the store, seeding it from the persisted slot when `restore` is set.
    ///
    /// Without `restore` the slot is still read and parsed, the result is
    /// dropped, and the empty list is written back over it.
    pub fn open(storage: S, restore: bool) -> Self {
        let initial = load_initial(&storage);
        let mut store = Self {
            storage,
            tasks: Vec::new(),
        };

        if restore {
            store.tasks = initial;
        } else {
            debug!(discarded = initial.len(), "starting without restoring tasks");
            store.persist();
        }

        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add(&mut self, text: &str) -> Option<&Task> {
        if text.is_empty() {
            return None;
        }

        self.tasks.push(Task::new(text));
        self.persist();
        self.tasks.last()
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.completed = !task.completed;
        }
        self.persist();
    }

    pub fn remove(&mut self, id: &str) {
        self.tasks.retain(|task| task.id != id);
        self.persist();
    }

    pub fn snapshot(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(&self.tasks)?)
    }

    fn persist(&mut self) {
        let result = self
            .snapshot()
            .and_then(|snapshot| self.storage.set(TODOS_KEY, &snapshot));

        match result {
            Ok(()) => debug!(tasks = self.tasks.len(), "persisted task list"),
            Err(err) => error!(error = %err, "failed to persist task list"),
        }
    }
}

/// Reads the persisted task list, falling back to an empty list.
pub fn load_initial<S: KeyValueStorage + ?Sized>(storage: &S) -> Vec<Task> {
    match read_slot(storage) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable task list");
            Vec::new()
        }
    }
}

fn read_slot<S: KeyValueStorage + ?Sized>(storage: &S) -> Result<Vec<Task>, AppError> {
    match storage.get(TODOS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}
