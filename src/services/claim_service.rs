//! Claim toggling: the only operation that mutates a tile's claim field.

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    claims::{ClaimSet, ClaimantCode, apply_toggle},
    config::ToggleGuard,
    dao::board_store::BoardStore,
    error::ServiceError,
    state::{SharedState, TileKey},
};

/// Claim of a tile before and after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Claim read before the toggle.
    pub previous: ClaimSet,
    /// Claim written back.
    pub next: ClaimSet,
}

impl ToggleOutcome {
    /// Whether the written claim differs from the one read.
    pub fn changed(&self) -> bool {
        self.previous != self.next
    }
}

/// Toggle `code` on tile `(x, y)` of `board_id`.
///
/// The board's claim mode decides the next claim; the result is written back with a
/// single tile update. Under [`ToggleGuard::PerTile`] the read and the write happen while
/// holding that tile's lock.
pub async fn toggle_claim(
    state: &SharedState,
    board_id: Uuid,
    x: u32,
    y: u32,
    code: ClaimantCode,
) -> Result<ToggleOutcome, ServiceError> {
    let store = state.require_board_store().await?;

    let outcome = match state.config().toggle_guard() {
        ToggleGuard::PerTile => {
            let _guard = state.tile_locks().lock(TileKey { board_id, x, y }).await;
            read_modify_write(store.as_ref(), board_id, x, y, code).await?
        }
        ToggleGuard::Unguarded => read_modify_write(store.as_ref(), board_id, x, y, code).await?,
    };

    info!(
        board_id = %board_id,
        x,
        y,
        code = %code,
        previous = %outcome.previous,
        next = %outcome.next,
        "claim toggled"
    );
    Ok(outcome)
}

async fn read_modify_write(
    store: &dyn BoardStore,
    board_id: Uuid,
    x: u32,
    y: u32,
    code: ClaimantCode,
) -> Result<ToggleOutcome, ServiceError> {
    let Some(mode) = store.board_mode(board_id).await? else {
        return Err(board_not_found(board_id));
    };
    let Some(previous) = store.tile_claim(board_id, x, y).await? else {
        return Err(tile_not_found(board_id, x, y));
    };

    let next = apply_toggle(mode, &previous, code);
    if next == previous {
        debug!(board_id = %board_id, x, y, code = %code, mode = ?mode, "toggle leaves claim unchanged");
    }

    // The tile can disappear between read and write when its board is deleted.
    if !store.set_tile_claim(board_id, x, y, next.clone()).await? {
        return Err(tile_not_found(board_id, x, y));
    }

    Ok(ToggleOutcome { previous, next })
}

fn board_not_found(board_id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("board `{board_id}` not found"))
}

fn tile_not_found(board_id: Uuid, x: u32, y: u32) -> ServiceError {
    ServiceError::NotFound(format!("tile ({x}, {y}) not found on board `{board_id}`"))
}
