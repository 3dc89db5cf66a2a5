use crate::model::Task;
use crate::storage::KeyValueStorage;
use crate::task_store::TaskStore;
use crate::theme::ThemeMode;

/// Editor session state: the task store, the pending input, and the theme.
///
/// The shell owns one of these and hands it to whatever renders the view.
#[derive(Debug)]
pub struct TodoApp<S: KeyValueStorage> {
    store: TaskStore<S>,
    input: String,
    theme: ThemeMode,
}

impl<S: KeyValueStorage> TodoApp<S> {
    pub fn new(store: TaskStore<S>, theme: ThemeMode) -> Self {
        Self {
            store,
            input: String::new(),
            theme,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input<T: Into<String>>(&mut self, text: T) {
        self.input = text.into();
    }

    /// Adds the pending input as a task. The buffer is cleared only on success.
    pub fn submit(&mut self) -> Option<Task> {
        let added = self.store.add(&self.input).cloned();
        if added.is_some() {
            self.input.clear();
        }
        added
    }

    pub fn task_id_at(&self, row: usize) -> Option<&str> {
        row.checked_sub(1)
            .and_then(|index| self.store.tasks().get(index))
            .map(|task| task.id.as_str())
    }

    pub fn toggle_row(&mut self, row: usize) -> Option<Task> {
        let id = self.task_id_at(row)?.to_string();
        self.store.toggle(&id);
        self.store.tasks().iter().find(|task| task.id == id).cloned()
    }

    pub fn remove_row(&mut self, row: usize) -> Option<Task> {
        let removed = self.store.tasks().get(row.checked_sub(1)?)?.clone();
        self.store.remove(&removed.id);
        Some(removed)
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }
}
