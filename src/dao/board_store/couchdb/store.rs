use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};
use tracing::debug;
use uuid::Uuid;

use crate::{
    claims::{ClaimMode, ClaimSet},
    dao::{
        board_store::BoardStore,
        models::{
            BoardEntity, BoardSummaryEntity, BoardTilesEntity, ClaimMatrixEntity, TileEntity,
        },
        storage::{StorageError, StorageFuture},
    },
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        AllDocsResponse, BOARD_PREFIX, BulkDocsRequest, BulkDocsResult, CouchBoardDocument,
        CouchTileDocument, DeletedDocument, END_SUFFIX, board_doc_id, board_tiles_prefix,
        tile_doc_id,
    },
};

/// Attempts made to write a tile claim when CouchDB reports a revision conflict.
const MAX_CONFLICT_ATTEMPTS: u32 = 3;

/// [`BoardStore`] backed by CouchDB.
#[derive(Clone)]
pub struct CouchBoardStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchBoardStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.database, path);
        self.authorize(self.client.request(method, url))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth {
            Some((ref user, ref pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = format!("{}/{}", self.base_url, self.database);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self
                    .authorize(self.client.put(&url))
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::DatabaseCreate {
                        database: database.clone(),
                        source,
                    })?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: response.status(),
            })
        }
    }

    async fn list_documents<T>(&self, prefix: &str) -> CouchResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        let mut documents = Vec::new();
        for row in payload.rows {
            if let Some(doc) = row.doc {
                let parsed = from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                    path: row.id,
                    source,
                })?;
                documents.push(parsed);
            }
        }

        Ok(documents)
    }

    /// Write several documents in one `_bulk_docs` round trip.
    async fn bulk_write(&self, docs: Vec<Value>) -> CouchResult<()> {
        const BULK_DOCS: &str = "_bulk_docs";
        let response = self
            .request(Method::POST, BULK_DOCS)
            .json(&BulkDocsRequest { docs })
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: BULK_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: BULK_DOCS.to_string(),
                status: response.status(),
            });
        }

        let results = response
            .json::<Vec<BulkDocsResult>>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse {
                path: BULK_DOCS.to_string(),
                source,
            })?;

        let rejected = results
            .into_iter()
            .filter(|result| result.error.is_some())
            .map(|result| result.id)
            .collect::<Vec<_>>();
        if rejected.is_empty() {
            Ok(())
        } else {
            Err(CouchDaoError::BulkRejected { doc_ids: rejected })
        }
    }

    async fn board(&self, id: Uuid) -> CouchResult<Option<BoardEntity>> {
        self.get_document::<CouchBoardDocument>(&board_doc_id(id))
            .await?
            .map(BoardEntity::try_from)
            .transpose()
    }

    async fn tiles(&self, board_id: Uuid) -> CouchResult<Vec<TileEntity>> {
        let docs = self
            .list_documents::<CouchTileDocument>(&board_tiles_prefix(board_id))
            .await?;
        Ok(docs.into_iter().map(TileEntity::from).collect())
    }

    /// Overwrite one tile's claim, re-reading the revision when another writer got there first.
    async fn write_claim(&self, board_id: Uuid, x: u32, y: u32, claim: ClaimSet) -> CouchResult<bool> {
        let doc_id = tile_doc_id(board_id, x, y);
        for attempt in 1..=MAX_CONFLICT_ATTEMPTS {
            let Some(mut doc) = self.get_document::<CouchTileDocument>(&doc_id).await? else {
                return Ok(false);
            };
            doc.tile.claim = claim.clone();
            match self.put_document(&doc_id, &doc).await {
                Ok(()) => return Ok(true),
                Err(CouchDaoError::RequestStatus { status, .. })
                    if status == StatusCode::CONFLICT =>
                {
                    debug!(doc_id = %doc_id, attempt, "tile revision conflict; retrying");
                }
                Err(err) => return Err(err),
            }
        }
        Err(CouchDaoError::Conflict {
            doc_id,
            attempts: MAX_CONFLICT_ATTEMPTS,
        })
    }
}

fn encode<T: Serialize>(doc_id: &str, document: &T) -> CouchResult<Value> {
    to_value(document).map_err(|source| CouchDaoError::EncodeDocument {
        doc_id: doc_id.to_string(),
        source,
    })
}

impl BoardStore for CouchBoardStore {
    fn create_board(&self, board: BoardEntity, tiles: Vec<TileEntity>) -> StorageFuture<()> {
        let store = self.clone();
        Box::pin(async move {
            let board_id = board.id;
            let board_doc = CouchBoardDocument::from(board);
            let mut docs = Vec::with_capacity(tiles.len() + 1);
            docs.push(encode(&board_doc.id, &board_doc)?);
            for tile in tiles {
                let tile_doc = CouchTileDocument::from((board_id, tile));
                docs.push(encode(&tile_doc.id, &tile_doc)?);
            }
            store.bulk_write(docs).await.map_err(Into::into)
        })
    }

    fn delete_board(&self, id: Uuid) -> StorageFuture<bool> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = board_doc_id(id);
            let Some(board_doc) = store.get_document::<CouchBoardDocument>(&doc_id).await? else {
                return Ok(false);
            };

            let tile_docs = store
                .list_documents::<CouchTileDocument>(&board_tiles_prefix(id))
                .await?;
            let mut tombstones = Vec::with_capacity(tile_docs.len() + 1);
            for doc in tile_docs {
                if let Some(rev) = doc.rev {
                    tombstones.push(encode(
                        &doc.id,
                        &DeletedDocument {
                            id: doc.id.clone(),
                            rev,
                            deleted: true,
                        },
                    )?);
                }
            }
            if let Some(rev) = board_doc.rev {
                tombstones.push(encode(
                    &doc_id,
                    &DeletedDocument {
                        id: doc_id.clone(),
                        rev,
                        deleted: true,
                    },
                )?);
            }

            store.bulk_write(tombstones).await?;
            Ok(true)
        })
    }

    fn find_board(&self, id: Uuid) -> StorageFuture<Option<BoardEntity>> {
        let store = self.clone();
        Box::pin(async move { store.board(id).await.map_err(Into::into) })
    }

    fn list_boards(&self) -> StorageFuture<Vec<BoardSummaryEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let docs = store
                .list_documents::<CouchBoardDocument>(BOARD_PREFIX)
                .await?;
            docs.into_iter()
                .map(|doc| {
                    let board = BoardEntity::try_from(doc)?;
                    Ok(BoardSummaryEntity::from(&board))
                })
                .collect::<Result<Vec<_>, CouchDaoError>>()
                .map_err(StorageError::from)
        })
    }

    fn board_mode(&self, id: Uuid) -> StorageFuture<Option<ClaimMode>> {
        let store = self.clone();
        Box::pin(async move {
            let board = store.board(id).await?;
            Ok(board.map(|board| board.mode()))
        })
    }

    fn tile_claim(&self, id: Uuid, x: u32, y: u32) -> StorageFuture<Option<ClaimSet>> {
        let store = self.clone();
        Box::pin(async move {
            let doc = store
                .get_document::<CouchTileDocument>(&tile_doc_id(id, x, y))
                .await?;
            Ok(doc.map(|doc| doc.tile.claim))
        })
    }

    fn set_tile_claim(&self, id: Uuid, x: u32, y: u32, claim: ClaimSet) -> StorageFuture<bool> {
        let store = self.clone();
        Box::pin(async move { store.write_claim(id, x, y, claim).await.map_err(Into::into) })
    }

    fn claim_matrix(&self, id: Uuid) -> StorageFuture<Option<ClaimMatrixEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(board) = store.board(id).await? else {
                return Ok(None);
            };
            let tiles = store.tiles(id).await?;
            Ok(Some(ClaimMatrixEntity::from_tiles(&board, &tiles)))
        })
    }

    fn board_tiles(&self, id: Uuid) -> StorageFuture<Option<BoardTilesEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(board) = store.board(id).await? else {
                return Ok(None);
            };
            let tiles = store.tiles(id).await?;
            Ok(Some(BoardTilesEntity::from_tiles(&board, &tiles)))
        })
    }

    fn health_check(&self) -> StorageFuture<()> {
        let store = self.clone();
        Box::pin(async move {
            let url = format!("{}/{}", store.base_url, store.database);
            let response = store
                .authorize(store.client.get(&url))
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    path: url.clone(),
                    source,
                })?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::RequestStatus {
                    path: url,
                    status: response.status(),
                }
                .into())
            }
        })
    }

    fn try_reconnect(&self) -> StorageFuture<()> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
