use mongodb::bson::{self, DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{BoardEntity, TileEntity};

use super::error::MongoDaoError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MongoBoardDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    title: String,
    description: String,
    game: String,
    version: String,
    authors: String,
    difficulty: f64,
    width: u32,
    height: u32,
    allow_multiple_claims: bool,
    created_at: DateTime,
}

impl From<BoardEntity> for MongoBoardDocument {
    fn from(value: BoardEntity) -> Self {
        Self {
            id: bson_uuid(value.id),
            title: value.title,
            description: value.description,
            game: value.game,
            version: value.version,
            authors: value.authors,
            difficulty: value.difficulty,
            width: value.width,
            height: value.height,
            allow_multiple_claims: value.allow_multiple_claims,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoBoardDocument> for BoardEntity {
    fn from(value: MongoBoardDocument) -> Self {
        Self {
            id: Uuid::from_bytes(value.id.bytes()),
            title: value.title,
            description: value.description,
            game: value.game,
            version: value.version,
            authors: value.authors,
            difficulty: value.difficulty,
            width: value.width,
            height: value.height,
            allow_multiple_claims: value.allow_multiple_claims,
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// One tile row; `(board_id, x, y)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MongoTileDocument {
    pub(crate) board_id: bson::Uuid,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) text: String,
    pub(crate) tooltip: String,
    pub(crate) difficulty: f64,
    #[serde(default)]
    pub(crate) claim: String,
}

impl From<(Uuid, TileEntity)> for MongoTileDocument {
    fn from((board_id, tile): (Uuid, TileEntity)) -> Self {
        Self {
            board_id: bson_uuid(board_id),
            x: tile.x,
            y: tile.y,
            text: tile.text,
            tooltip: tile.tooltip,
            difficulty: tile.difficulty,
            claim: tile.claim.to_string(),
        }
    }
}

impl TryFrom<MongoTileDocument> for TileEntity {
    type Error = MongoDaoError;

    fn try_from(doc: MongoTileDocument) -> Result<Self, Self::Error> {
        let claim = doc.claim.parse().map_err(|_| MongoDaoError::InvalidClaim {
            id: Uuid::from_bytes(doc.board_id.bytes()),
            raw: doc.claim.clone(),
        })?;
        Ok(TileEntity {
            x: doc.x,
            y: doc.y,
            text: doc.text,
            tooltip: doc.tooltip,
            difficulty: doc.difficulty,
            claim,
        })
    }
}

pub(crate) fn bson_uuid(id: Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(id.into_bytes())
}

pub(crate) fn doc_id(id: Uuid) -> Document {
    doc! {"_id": bson_uuid(id)}
}

pub(crate) fn board_tiles(id: Uuid) -> Document {
    doc! {"board_id": bson_uuid(id)}
}

pub(crate) fn tile_key(id: Uuid, x: u32, y: u32) -> Document {
    doc! {"board_id": bson_uuid(id), "x": i64::from(x), "y": i64::from(y)}
}
