use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo record. `id` is opaque and only used for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(alias = "isCompleted")]
    pub completed: bool,
}

impl Task {
    /// Builds a pending task with a fresh random id.
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}
