use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating or updating a task.
///
/// `completed` is accepted so that clients may send the full task shape back,
/// but neither create nor update honours it: new tasks start open and every
/// update marks the task completed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must not be empty.
    #[validate(length(min = 1))]
    pub title: String,

    /// The description of the task. Must not be empty.
    #[validate(length(min = 1))]
    pub description: String,

    #[serde(default)]
    pub completed: bool,
}

/// A task entity as held by the task store and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier assigned once at creation (UUID v4 text).
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl Task {
    /// Creates a new open `Task` from `TaskInput` with a freshly generated id.
    pub fn new(input: TaskInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            completed: false,
        }
    }

    /// Builds the replacement stored by an update: same id, new title and
    /// description, always completed.
    pub fn completed_from(id: String, input: TaskInput) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            completed: true,
        }
    }
}
