//! In-memory stores.
//!
//! Both stores wrap a [`Keyed`] map guarded by a single reader/writer lock.
//! The lock is never handed out: every public store operation runs as one
//! closure inside one critical section, so a reader never observes a
//! half-applied write.

pub mod tasks;
pub mod users;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use crate::auth::{HashError, TokenError};

pub use tasks::TaskStore;
pub use users::UserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
    /// Unknown username and wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Hash(#[from] HashError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// A `HashMap` keyed by generated id behind one `RwLock`.
pub(crate) struct Keyed<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Keyed<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Runs `f` under the shared lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&HashMap<String, V>) -> R) -> R {
        // Closures never leave the map half-mutated, so a poisoned lock still guards consistent data.
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` under the exclusive lock.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut HashMap<String, V>) -> R) -> R {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<V> Default for Keyed<V> {
    fn default() -> Self {
        Self::new()
    }
}
