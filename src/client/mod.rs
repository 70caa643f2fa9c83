//! Poll-based claim synchronization for board viewers.
//!
//! A [`BoardView`] holds what one viewer currently shows; a [`ClaimSyncClient`] keeps it in
//! step with a [`ClaimSource`] by polling the claim matrix and repainting only the tiles
//! whose claim changed.

mod error;
mod http;
mod prefs;
mod sync;
mod view;

pub use self::error::{ClientError, ClientResult};
pub use self::http::HttpClaimSource;
pub use self::prefs::ClientPrefs;
pub use self::sync::{ClaimSource, ClaimSyncClient, DEFAULT_POLL_INTERVAL, PollOutcome};
pub use self::view::{BoardView, Reconciliation, Repaint, TileSurface};
pub use crate::dto::claim::ClaimMatrixResponse as ClaimMatrix;
