//! Record store for customer rows.
//!
//! # Responsibility
//! - Own the single SQLite connection holding the `customers` table.
//! - Serve one-shot reads and writes off the async executor.
//! - Publish live query streams that re-run whenever the table changes.
//!
//! # Invariants
//! - Only writes that changed at least one row notify subscribers.
//! - Live streams emit the current result on subscribe.
//! - Storage failures are returned to the caller; nothing is retried.

use crate::db::DbError;
use futures::stream::BoxStream;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod customer_store;
mod invalidation;

pub use customer_store::CustomerStore;
pub use invalidation::InvalidationTracker;

pub type StoreResult<T> = Result<T, StoreError>;

/// Live query stream. Each item is a fresh query result or the storage
/// error that prevented producing one.
pub type LiveQuery<T> = BoxStream<'static, StoreResult<T>>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A previous holder of the connection lock panicked.
    Poisoned,
    /// The blocking worker running the query failed or was cancelled.
    Worker(String),
    /// `close` was called while other handles to the store are alive.
    StillShared,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "customer store connection lock is poisoned"),
            Self::Worker(message) => write!(f, "customer store worker failed: {message}"),
            Self::StillShared => write!(
                f,
                "customer store is still referenced by live subscriptions or handles"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
