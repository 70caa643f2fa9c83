//! Process-local board store used when no database is configured and in tests.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    claims::{ClaimMode, ClaimSet},
    dao::{
        board_store::BoardStore,
        models::{
            BoardEntity, BoardSummaryEntity, BoardTilesEntity, ClaimMatrixEntity, TileEntity,
        },
        storage::StorageFuture,
    },
};

/// Board store keeping everything behind a single async lock.
///
/// Every call takes the lock once, so a read followed by a write from the
/// caller is two separate critical sections.
#[derive(Clone, Default)]
pub struct MemoryBoardStore {
    boards: Arc<RwLock<IndexMap<Uuid, MemoryBoard>>>,
}

struct MemoryBoard {
    board: BoardEntity,
    tiles: IndexMap<(u32, u32), TileEntity>,
}

impl MemoryBoardStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardStore for MemoryBoardStore {
    fn create_board(&self, board: BoardEntity, tiles: Vec<TileEntity>) -> StorageFuture<()> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let tiles = tiles
                .into_iter()
                .filter(|tile| board.contains(tile.x, tile.y))
                .map(|tile| ((tile.x, tile.y), tile))
                .collect();
            boards
                .write()
                .await
                .insert(board.id, MemoryBoard { board, tiles });
            Ok(())
        })
    }

    fn delete_board(&self, id: Uuid) -> StorageFuture<bool> {
        let boards = self.boards.clone();
        Box::pin(async move { Ok(boards.write().await.shift_remove(&id).is_some()) })
    }

    fn find_board(&self, id: Uuid) -> StorageFuture<Option<BoardEntity>> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let guard = boards.read().await;
            Ok(guard.get(&id).map(|entry| entry.board.clone()))
        })
    }

    fn list_boards(&self) -> StorageFuture<Vec<BoardSummaryEntity>> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let guard = boards.read().await;
            Ok(guard
                .values()
                .map(|entry| BoardSummaryEntity::from(&entry.board))
                .collect())
        })
    }

    fn board_mode(&self, id: Uuid) -> StorageFuture<Option<ClaimMode>> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let guard = boards.read().await;
            Ok(guard.get(&id).map(|entry| entry.board.mode()))
        })
    }

    fn tile_claim(&self, id: Uuid, x: u32, y: u32) -> StorageFuture<Option<ClaimSet>> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let guard = boards.read().await;
            Ok(guard
                .get(&id)
                .and_then(|entry| entry.tiles.get(&(x, y)))
                .map(|tile| tile.claim.clone()))
        })
    }

    fn set_tile_claim(&self, id: Uuid, x: u32, y: u32, claim: ClaimSet) -> StorageFuture<bool> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let mut guard = boards.write().await;
            let Some(tile) = guard
                .get_mut(&id)
                .and_then(|entry| entry.tiles.get_mut(&(x, y)))
            else {
                return Ok(false);
            };
            tile.claim = claim;
            Ok(true)
        })
    }

    fn claim_matrix(&self, id: Uuid) -> StorageFuture<Option<ClaimMatrixEntity>> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let guard = boards.read().await;
            Ok(guard
                .get(&id)
                .map(|entry| ClaimMatrixEntity::from_tiles(&entry.board, entry.tiles.values())))
        })
    }

    fn board_tiles(&self, id: Uuid) -> StorageFuture<Option<BoardTilesEntity>> {
        let boards = self.boards.clone();
        Box::pin(async move {
            let guard = boards.read().await;
            Ok(guard
                .get(&id)
                .map(|entry| BoardTilesEntity::from_tiles(&entry.board, entry.tiles.values())))
        })
    }

    fn health_check(&self) -> StorageFuture<()> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> StorageFuture<()> {
        Box::pin(async { Ok(()) })
    }
}
