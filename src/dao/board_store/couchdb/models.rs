use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    claims::ClaimSet,
    dao::{
        board_store::couchdb::error::CouchDaoError,
        models::{BoardEntity, TileEntity},
    },
};

pub(crate) const BOARD_PREFIX: &str = "board::";
pub(crate) const TILE_PREFIX: &str = "tile::";
pub(crate) const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub(crate) struct AllDocsResponse {
    pub(crate) rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllDocsRow {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) doc: Option<Value>,
}

/// Body of a `_bulk_docs` request.
#[derive(Debug, Serialize)]
pub(crate) struct BulkDocsRequest<T> {
    pub(crate) docs: Vec<T>,
}

/// Per-document outcome reported by `_bulk_docs`.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkDocsResult {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Tombstone written to delete a document through `_bulk_docs`.
#[derive(Debug, Serialize)]
pub(crate) struct DeletedDocument {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    #[serde(rename = "_rev")]
    pub(crate) rev: String,
    #[serde(rename = "_deleted")]
    pub(crate) deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CouchBoardDocument {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub(crate) rev: Option<String>,
    #[serde(flatten)]
    pub(crate) board: BoardBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BoardBody {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) game: String,
    pub(crate) version: String,
    pub(crate) authors: String,
    pub(crate) difficulty: f64,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) allow_multiple_claims: bool,
    pub(crate) created_at: SystemTime,
}

impl From<BoardEntity> for CouchBoardDocument {
    fn from(board: BoardEntity) -> Self {
        Self {
            id: board_doc_id(board.id),
            rev: None,
            board: BoardBody {
                title: board.title,
                description: board.description,
                game: board.game,
                version: board.version,
                authors: board.authors,
                difficulty: board.difficulty,
                width: board.width,
                height: board.height,
                allow_multiple_claims: board.allow_multiple_claims,
                created_at: board.created_at,
            },
        }
    }
}

impl TryFrom<CouchBoardDocument> for BoardEntity {
    type Error = CouchDaoError;

    fn try_from(doc: CouchBoardDocument) -> Result<Self, Self::Error> {
        let body = doc.board;
        Ok(Self {
            id: extract_uuid(&doc.id)?,
            title: body.title,
            description: body.description,
            game: body.game,
            version: body.version,
            authors: body.authors,
            difficulty: body.difficulty,
            width: body.width,
            height: body.height,
            allow_multiple_claims: body.allow_multiple_claims,
            created_at: body.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CouchTileDocument {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub(crate) rev: Option<String>,
    #[serde(flatten)]
    pub(crate) tile: TileBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TileBody {
    pub(crate) board_id: Uuid,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) text: String,
    pub(crate) tooltip: String,
    pub(crate) difficulty: f64,
    #[serde(default)]
    pub(crate) claim: ClaimSet,
}

impl From<(Uuid, TileEntity)> for CouchTileDocument {
    fn from((board_id, tile): (Uuid, TileEntity)) -> Self {
        Self {
            id: tile_doc_id(board_id, tile.x, tile.y),
            rev: None,
            tile: TileBody {
                board_id,
                x: tile.x,
                y: tile.y,
                text: tile.text,
                tooltip: tile.tooltip,
                difficulty: tile.difficulty,
                claim: tile.claim,
            },
        }
    }
}

impl From<CouchTileDocument> for TileEntity {
    fn from(doc: CouchTileDocument) -> Self {
        TileEntity {
            x: doc.tile.x,
            y: doc.tile.y,
            text: doc.tile.text,
            tooltip: doc.tile.tooltip,
            difficulty: doc.tile.difficulty,
            claim: doc.tile.claim,
        }
    }
}

pub(crate) fn board_doc_id(id: Uuid) -> String {
    format!("{}{}", BOARD_PREFIX, id)
}

/// Key prefix shared by every tile of a board, usable as an `_all_docs` range start.
pub(crate) fn board_tiles_prefix(board_id: Uuid) -> String {
    format!("{}{}::", TILE_PREFIX, board_id)
}

pub(crate) fn tile_doc_id(board_id: Uuid, x: u32, y: u32) -> String {
    format!("{}{:04}:{:04}", board_tiles_prefix(board_id), y, x)
}

pub(crate) fn extract_uuid(doc_id: &str) -> Result<Uuid, CouchDaoError> {
    let (_, id) = doc_id
        .split_once("::")
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing separator",
        })?;

    Uuid::parse_str(id).map_err(|_| CouchDaoError::InvalidDocId {
        doc_id: doc_id.to_string(),
        kind: "invalid UUID",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_ids_sort_row_major_under_their_board() {
        let board = Uuid::new_v4();
        let first = tile_doc_id(board, 9, 0);
        let second = tile_doc_id(board, 0, 1);
        assert!(first < second);
        assert!(first.starts_with(&board_tiles_prefix(board)));
    }

    #[test]
    fn board_id_round_trips_through_doc_id() {
        let id = Uuid::new_v4();
        assert_eq!(extract_uuid(&board_doc_id(id)).unwrap(), id);
        assert!(extract_uuid("board-no-separator").is_err());
    }
}
