/// CouchDB backend: one document per board and per tile.
#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
/// MongoDB backend: `boards` and `tiles` collections.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use uuid::Uuid;

use crate::claims::{ClaimMode, ClaimSet};
use crate::dao::models::{
    BoardEntity, BoardSummaryEntity, BoardTilesEntity, ClaimMatrixEntity, TileEntity,
};
use crate::dao::storage::StorageFuture;

pub use memory::MemoryBoardStore;

/// Abstraction over the persistence layer for boards and their tiles.
///
/// Each tile row is written independently; no operation spans several tiles
/// except board creation and deletion.
pub trait BoardStore: Send + Sync {
    /// Persist a new board together with all of its tiles.
    fn create_board(&self, board: BoardEntity, tiles: Vec<TileEntity>) -> StorageFuture<()>;
    /// Remove a board and its tiles, returning whether the board existed.
    fn delete_board(&self, id: Uuid) -> StorageFuture<bool>;
    /// Board metadata, `None` when the board does not exist.
    fn find_board(&self, id: Uuid) -> StorageFuture<Option<BoardEntity>>;
    /// Summaries of every stored board.
    fn list_boards(&self) -> StorageFuture<Vec<BoardSummaryEntity>>;
    /// Claim mode of a board, `None` when the board does not exist.
    fn board_mode(&self, id: Uuid) -> StorageFuture<Option<ClaimMode>>;
    /// Current claim of one tile, `None` when the tile does not exist.
    fn tile_claim(&self, id: Uuid, x: u32, y: u32) -> StorageFuture<Option<ClaimSet>>;
    /// Overwrite the claim of one tile, returning `false` when the tile does not exist.
    fn set_tile_claim(&self, id: Uuid, x: u32, y: u32, claim: ClaimSet) -> StorageFuture<bool>;
    /// Claim of every tile, `None` when the board does not exist.
    fn claim_matrix(&self, id: Uuid) -> StorageFuture<Option<ClaimMatrixEntity>>;
    /// Content of every tile, `None` when the board does not exist.
    fn board_tiles(&self, id: Uuid) -> StorageFuture<Option<BoardTilesEntity>>;
    /// Cheap round trip to the backend.
    fn health_check(&self) -> StorageFuture<()>;
    /// Drop and re-establish the backend connection.
    fn try_reconnect(&self) -> StorageFuture<()>;
}
