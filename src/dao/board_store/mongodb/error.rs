use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::storage::StorageError;

/// Result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
///
/// `source` fields carry the driver error; `id` names the board involved.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// URI as configured.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The driver rejected the client options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The server never answered the first ping.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Pings sent before giving up.
        attempts: u32,
        /// Last driver error.
        #[source]
        source: MongoError,
    },
    /// A periodic health ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An index could not be created.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Indexed keys.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Writing a new board or its tiles failed.
    #[error("failed to save board `{id}`")]
    SaveBoard {
        /// Board identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Deleting a board or its tiles failed.
    #[error("failed to delete board `{id}`")]
    DeleteBoard {
        /// Board identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Reading a board document failed.
    #[error("failed to load board `{id}`")]
    LoadBoard {
        /// Board identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Listing board documents failed.
    #[error("failed to list boards")]
    ListBoards {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Reading tile documents failed.
    #[error("failed to load tiles of board `{id}`")]
    LoadTiles {
        /// Board identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Writing a tile claim failed.
    #[error("failed to update claim of tile ({x}, {y}) on board `{id}`")]
    UpdateClaim {
        /// Board identifier.
        id: Uuid,
        /// Column of the tile.
        x: u32,
        /// Row of the tile.
        y: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A stored claim string holds characters outside `1`..`8`.
    #[error("stored claim `{raw}` on board `{id}` is invalid")]
    InvalidClaim {
        /// Board identifier.
        id: Uuid,
        /// Claim string as stored.
        raw: String,
    },
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::InvalidClaim { id, raw } => {
                StorageError::corrupted(format!("board {id}"), format!("invalid claim `{raw}`"))
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
