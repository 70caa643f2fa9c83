use std::path::PathBuf;

use thiserror::Error;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced by the claim sync client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a complete answer.
    #[error("request to `{url}` failed")]
    Transport {
        /// Address that was requested.
        url: String,
        /// Underlying HTTP client failure.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("server answered {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status reason.
        message: String,
    },
    /// The body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The preferences file could not be read or written.
    #[error("failed to access preferences at `{path}`")]
    PrefsIo {
        /// Preferences file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The preferences file is not valid JSON.
    #[error("invalid preferences at `{path}`")]
    PrefsFormat {
        /// Preferences file.
        path: PathBuf,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Whether the board can no longer be shown: it is gone or its claims cannot be read.
    ///
    /// Transport failures and other statuses are transient and do not count.
    pub fn board_unavailable(&self) -> bool {
        matches!(
            self,
            ClientError::Status { status: 404, .. } | ClientError::Malformed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_or_unreadable_boards_are_unavailable() {
        let gone = ClientError::Status {
            status: 404,
            message: "board not found".into(),
        };
        let degraded = ClientError::Status {
            status: 503,
            message: "degraded mode".into(),
        };
        assert!(gone.board_unavailable());
        assert!(ClientError::Malformed("expected value".into()).board_unavailable());
        assert!(!degraded.board_unavailable());
    }
}
