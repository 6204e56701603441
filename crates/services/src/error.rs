//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::SessionPhase;

/// Errors emitted by the session controller.
///
/// These are expected-state failures; none of them mutate the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available")]
    NoQuestionsAvailable,
    #[error("cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },
    #[error("choice {index} is out of range")]
    InvalidChoice { index: usize },
}

/// Errors emitted while loading the question pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question resource not found")]
    NotFound,
    #[error("question resource is malformed: {0}")]
    Malformed(#[source] StorageError),
    #[error("question resource is unreachable: {0}")]
    Unreachable(#[source] StorageError),
}

impl From<StorageError> for LoadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::NotFound,
            StorageError::Serialization(_) | StorageError::InvalidQuestion { .. } => {
                Self::Malformed(err)
            }
            _ => Self::Unreachable(err),
        }
    }
}

/// Errors emitted by `HistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
