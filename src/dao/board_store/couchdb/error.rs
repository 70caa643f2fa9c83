//! Error types shared by the CouchDB storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`CouchDaoError`] failures.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures that can occur while interacting with CouchDB.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// Required environment variable is missing.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        /// Underlying failure.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB rejected a GET against the target database.
    #[error("failed to query CouchDB database `{database}`")]
    DatabaseQuery {
        /// Database name.
        database: String,
        /// Underlying failure.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB rejected a database creation request.
    #[error("failed to create CouchDB database `{database}`")]
    DatabaseCreate {
        /// Database name.
        database: String,
        /// Underlying failure.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB returned an unexpected status code for a database operation.
    #[error("unexpected CouchDB database response status {status} for `{database}`")]
    DatabaseStatus {
        /// Database name.
        database: String,
        /// Status returned by CouchDB.
        status: StatusCode,
    },
    /// A request to a document endpoint could not be sent.
    #[error("failed to send CouchDB request to `{path}`")]
    RequestSend {
        /// Request path relative to the server.
        path: String,
        /// Underlying failure.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB returned an unexpected status code for a document endpoint.
    #[error("unexpected CouchDB response status {status} for `{path}`")]
    RequestStatus {
        /// Request path relative to the server.
        path: String,
        /// Status returned by CouchDB.
        status: StatusCode,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode CouchDB response for `{path}`")]
    DecodeResponse {
        /// Request path relative to the server.
        path: String,
        /// Underlying failure.
        #[source]
        source: reqwest::Error,
    },
    /// Decoding a JSON value into the expected model failed.
    #[error("failed to deserialize CouchDB value for `{path}`")]
    DeserializeValue {
        /// Request path relative to the server.
        path: String,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// A board or tile could not be turned into a JSON document.
    #[error("failed to encode CouchDB document `{doc_id}`")]
    EncodeDocument {
        /// Document identifier.
        doc_id: String,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// A bulk write left some documents unwritten.
    #[error("bulk write rejected for documents {doc_ids:?}")]
    BulkRejected {
        /// Documents that were not written.
        doc_ids: Vec<String>,
    },
    /// A tile write kept hitting revision conflicts.
    #[error("tile document `{doc_id}` still conflicting after {attempts} attempt(s)")]
    Conflict {
        /// Document identifier.
        doc_id: String,
        /// Writes attempted.
        attempts: u32,
    },
    /// Failed to parse a document ID into UUIDs.
    #[error("invalid document ID `{doc_id}`: {kind}")]
    InvalidDocId {
        /// Document identifier.
        doc_id: String,
        /// Which part of the identifier is malformed.
        kind: &'static str,
    },
}

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        match err {
            CouchDaoError::InvalidDocId { doc_id, kind } => StorageError::corrupted(doc_id, kind),
            CouchDaoError::DeserializeValue { path, source } => StorageError::corrupted(path, source),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
