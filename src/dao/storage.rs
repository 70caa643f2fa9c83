use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by every [`BoardStore`](super::board_store::BoardStore) operation.
pub type StorageFuture<T> = BoxFuture<'static, StorageResult<T>>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What was being attempted.
        message: String,
        /// Backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A persisted record could not be turned back into a domain value.
    #[error("corrupted record `{record}`: {reason}")]
    Corrupted {
        /// Identifier of the offending record.
        record: String,
        /// Why it could not be decoded.
        reason: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corruption error for a record that failed domain validation.
    pub fn corrupted(record: impl Into<String>, reason: impl ToString) -> Self {
        StorageError::Corrupted {
            record: record.into(),
            reason: reason.to_string(),
        }
    }
}
