use crate::models::{Task, TaskInput};
use crate::store::{Keyed, StoreError};

/// Concurrent in-memory collection of tasks.
///
/// `get` and `list` take the shared lock; `create`, `update` and `delete` take
/// the exclusive lock. Concurrent writers are serialized in lock-acquisition
/// order, not request arrival order.
#[derive(Default)]
pub struct TaskStore {
    tasks: Keyed<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new open task under a freshly generated id and returns it.
    pub fn create(&self, input: TaskInput) -> Task {
        let task = Task::new(input);
        self.tasks.write(|tasks| {
            tasks.insert(task.id.clone(), task.clone());
        });
        log::debug!("Created task {}", task.id);
        task
    }

    pub fn get(&self, id: &str) -> Result<Task, StoreError> {
        self.tasks
            .read(|tasks| tasks.get(id).cloned())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Returns every stored task. Order is unspecified.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.read(|tasks| tasks.values().cloned().collect())
    }

    /// Replaces title and description of `id` and marks it completed.
    ///
    /// `input.completed` is ignored: an updated task is always completed.
    pub fn update(&self, id: &str, input: TaskInput) -> Result<Task, StoreError> {
        let updated = self.tasks.write(|tasks| {
            let slot = tasks.get_mut(id)?;
            *slot = Task::completed_from(id.to_string(), input);
            Some(slot.clone())
        });

        match updated {
            Some(task) => {
                log::debug!("Updated task {}", id);
                Ok(task)
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.tasks
            .write(|tasks| tasks.remove(id))
            .map(|_| log::debug!("Deleted task {}", id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tasks.read(|tasks| tasks.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
