use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::{Client, Collection, Database, IndexModel, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoBoardDocument, MongoTileDocument, board_tiles, doc_id, tile_key},
};
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

const BOARD_COLLECTION_NAME: &str = "boards";
const TILE_COLLECTION_NAME: &str = "tiles";

/// [`BoardStore`] backed by MongoDB.
#[derive(Clone)]
pub struct MongoBoardStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoBoardStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let board_index = IndexModel::builder()
            .keys(doc! {"title": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("board_title_idx".to_owned()))
                    .build(),
            )
            .build();

        self.boards()
            .await
            .create_index(board_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: BOARD_COLLECTION_NAME,
                index: "title",
                source,
            })?;

        // One row per coordinate; claim updates address it by this key.
        let tile_index = IndexModel::builder()
            .keys(doc! {"board_id": 1, "y": 1, "x": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("tile_coordinate_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        self.tiles()
            .await
            .create_index(tile_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: TILE_COLLECTION_NAME,
                index: "board_id,y,x",
                source,
            })?;

        Ok(())
    }

    async fn boards(&self) -> Collection<MongoBoardDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoBoardDocument>(BOARD_COLLECTION_NAME)
    }

    async fn tiles(&self) -> Collection<MongoTileDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoTileDocument>(TILE_COLLECTION_NAME)
    }

    async fn create_board(&self, board: BoardEntity, tiles: Vec<TileEntity>) -> MongoResult<()> {
        let id = board.id;
        let document: MongoBoardDocument = board.into();
        self.boards()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveBoard { id, source })?;

        if tiles.is_empty() {
            return Ok(());
        }

        let tile_docs = tiles
            .into_iter()
            .map(|tile| MongoTileDocument::from((id, tile)))
            .collect::<Vec<_>>();
        self.tiles()
            .await
            .insert_many(tile_docs)
            .await
            .map_err(|source| MongoDaoError::SaveBoard { id, source })?;

        Ok(())
    }

    async fn delete_board(&self, id: Uuid) -> MongoResult<bool> {
        self.tiles()
            .await
            .delete_many(board_tiles(id))
            .await
            .map_err(|source| MongoDaoError::DeleteBoard { id, source })?;

        let result = self
            .boards()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteBoard { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_board(&self, id: Uuid) -> MongoResult<Option<BoardEntity>> {
        let document = self
            .boards()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadBoard { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_boards(&self) -> MongoResult<Vec<BoardSummaryEntity>> {
        let documents: Vec<MongoBoardDocument> = self
            .boards()
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListBoards { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListBoards { source })?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let board: BoardEntity = document.into();
                BoardSummaryEntity::from(&board)
            })
            .collect())
    }

    async fn load_tiles(&self, id: Uuid) -> MongoResult<Vec<TileEntity>> {
        let documents: Vec<MongoTileDocument> = self
            .tiles()
            .await
            .find(board_tiles(id))
            .await
            .map_err(|source| MongoDaoError::LoadTiles { id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadTiles { id, source })?;

        documents.into_iter().map(TileEntity::try_from).collect()
    }

    async fn tile_claim(&self, id: Uuid, x: u32, y: u32) -> MongoResult<Option<ClaimSet>> {
        let document = self
            .tiles()
            .await
            .find_one(tile_key(id, x, y))
            .await
            .map_err(|source| MongoDaoError::LoadTiles { id, source })?;

        document
            .map(|document| TileEntity::try_from(document).map(|tile| tile.claim))
            .transpose()
    }

    async fn set_tile_claim(&self, id: Uuid, x: u32, y: u32, claim: ClaimSet) -> MongoResult<bool> {
        let result = self
            .tiles()
            .await
            .update_one(
                tile_key(id, x, y),
                doc! {"$set": {"claim": claim.to_string()}},
            )
            .await
            .map_err(|source| MongoDaoError::UpdateClaim { id, x, y, source })?;
        Ok(result.matched_count > 0)
    }
}

impl BoardStore for MongoBoardStore {
    fn create_board(&self, board: BoardEntity, tiles: Vec<TileEntity>) -> StorageFuture<()> {
        let store = self.clone();
        Box::pin(async move { store.create_board(board, tiles).await.map_err(Into::into) })
    }

    fn delete_board(&self, id: Uuid) -> StorageFuture<bool> {
        let store = self.clone();
        Box::pin(async move { store.delete_board(id).await.map_err(Into::into) })
    }

    fn find_board(&self, id: Uuid) -> StorageFuture<Option<BoardEntity>> {
        let store = self.clone();
        Box::pin(async move { store.find_board(id).await.map_err(Into::into) })
    }

    fn list_boards(&self) -> StorageFuture<Vec<BoardSummaryEntity>> {
        let store = self.clone();
        Box::pin(async move { store.list_boards().await.map_err(Into::into) })
    }

    fn board_mode(&self, id: Uuid) -> StorageFuture<Option<ClaimMode>> {
        let store = self.clone();
        Box::pin(async move {
            let board = store.find_board(id).await?;
            Ok(board.map(|board| board.mode()))
        })
    }

    fn tile_claim(&self, id: Uuid, x: u32, y: u32) -> StorageFuture<Option<ClaimSet>> {
        let store = self.clone();
        Box::pin(async move { store.tile_claim(id, x, y).await.map_err(Into::into) })
    }

    fn set_tile_claim(&self, id: Uuid, x: u32, y: u32, claim: ClaimSet) -> StorageFuture<bool> {
        let store = self.clone();
        Box::pin(async move {
            store
                .set_tile_claim(id, x, y, claim)
                .await
                .map_err(Into::into)
        })
    }

    fn claim_matrix(&self, id: Uuid) -> StorageFuture<Option<ClaimMatrixEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(board) = store.find_board(id).await? else {
                return Ok(None);
            };
            let tiles = store.load_tiles(id).await?;
            Ok(Some(ClaimMatrixEntity::from_tiles(&board, &tiles)))
        })
    }

    fn board_tiles(&self, id: Uuid) -> StorageFuture<Option<BoardTilesEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(board) = store.find_board(id).await? else {
                return Ok(None);
            };
            let tiles = store.load_tiles(id).await?;
            Ok(Some(BoardTilesEntity::from_tiles(&board, &tiles)))
        })
    }

    fn health_check(&self) -> StorageFuture<()> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> StorageFuture<()> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
