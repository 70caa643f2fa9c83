use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    claims::ClaimMode,
    dao::models::{BoardEntity, BoardSummaryEntity, BoardTilesEntity, TileContentEntity},
    dto::format_system_time,
};

/// Uploaded board, in the layout written by the board generator.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBoardRequest {
    /// Title, authors and other descriptive fields.
    #[validate(nested)]
    pub metadata: BoardMetadataInput,
    /// Overall difficulty picked in the generator.
    #[serde(default)]
    pub difficulty: f64,
    /// Number of columns.
    #[validate(range(min = 1))]
    pub width: u32,
    /// Number of rows.
    #[validate(range(min = 1))]
    pub height: u32,
    /// Tile columns: `board[x][y]`, each `height` tiles long.
    pub board: Vec<Vec<TileInput>>,
    /// Multi-claim board when `true`, exclusive otherwise.
    #[serde(default)]
    pub allow_multiple_claims: bool,
}

/// Descriptive metadata of an uploaded board.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BoardMetadataInput {
    /// Board title; must not be empty.
    #[validate(length(min = 1))]
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Authors of the challenge list, stored joined with `,`.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Game the challenges refer to.
    #[serde(default)]
    pub game: String,
    /// Version of the challenge list.
    #[serde(default)]
    pub version: String,
}

/// One uploaded tile; missing fields default to empty text and difficulty 0.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TileInput {
    /// Challenge shown on the tile.
    #[serde(default)]
    pub text: String,
    /// Longer explanation shown on hover.
    #[serde(default)]
    pub tooltip: String,
    /// Difficulty of this challenge.
    #[serde(default)]
    pub difficulty: f64,
}

/// Entry of `GET /boards`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardListItem {
    /// Board identifier.
    pub id: Uuid,
    /// Board title.
    pub title: String,
    /// Board description.
    pub description: String,
}

impl From<BoardSummaryEntity> for BoardListItem {
    fn from(value: BoardSummaryEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
        }
    }
}

/// Board metadata returned by `GET /boards/{id}` and after creation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardMetadataResponse {
    /// Board identifier.
    pub id: Uuid,
    /// Board title.
    pub title: String,
    /// Board description.
    pub description: String,
    /// Game the challenges refer to.
    pub game: String,
    /// Version of the challenge list.
    pub version: String,
    /// Authors joined with `,`.
    pub authors: String,
    /// Overall difficulty.
    pub difficulty: f64,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Raw claim mode flag as uploaded.
    pub allow_multiple_claims: bool,
    /// Claim mode derived from `allow_multiple_claims`.
    pub claim_mode: ClaimMode,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<BoardEntity> for BoardMetadataResponse {
    fn from(value: BoardEntity) -> Self {
        Self {
            claim_mode: value.mode(),
            created_at: format_system_time(value.created_at),
            id: value.id,
            title: value.title,
            description: value.description,
            game: value.game,
            version: value.version,
            authors: value.authors,
            difficulty: value.difficulty,
            width: value.width,
            height: value.height,
            allow_multiple_claims: value.allow_multiple_claims,
        }
    }
}

/// Static tile content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TileContentResponse {
    /// Challenge shown on the tile.
    pub text: String,
    /// Longer explanation shown on hover.
    pub tooltip: String,
    /// Difficulty of this challenge.
    pub difficulty: f64,
}

impl From<TileContentEntity> for TileContentResponse {
    fn from(value: TileContentEntity) -> Self {
        Self {
            text: value.text,
            tooltip: value.tooltip,
            difficulty: value.difficulty,
        }
    }
}

/// Tile contents indexed `tiles[y][x]`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardTilesResponse {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// One row per `y`, one entry per `x`.
    pub tiles: Vec<Vec<TileContentResponse>>,
}

impl From<BoardTilesEntity> for BoardTilesResponse {
    fn from(value: BoardTilesEntity) -> Self {
        Self {
            width: value.width,
            height: value.height,
            tiles: value
                .tiles
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(board: serde_json::Value) -> CreateBoardRequest {
        serde_json::from_value(serde_json::json!({
            "metadata": {"title": "Speedrun", "authors": ["ana", "bo"]},
            "difficulty": 2.5,
            "width": 2,
            "height": 1,
            "board": board,
        }))
        .unwrap()
    }

    #[test]
    fn generator_output_parses_with_defaults() {
        let request = upload(serde_json::json!([
            [{"text": "a", "tooltip": "t", "difficulty": 1.0, "categories": ["x"]}],
            [{"text": "b"}]
        ]));
        assert!(request.validate().is_ok());
        assert!(!request.allow_multiple_claims);
        assert_eq!(request.board[1][0].tooltip, "");
        assert_eq!(request.board[1][0].difficulty, 0.0);
    }

    #[test]
    fn ragged_columns_fail_validation() {
        let request = upload(serde_json::json!([[{"text": "a"}], []]));
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_title_fails_validation() {
        let request: CreateBoardRequest = serde_json::from_value(serde_json::json!({
            "metadata": {"title": ""},
            "width": 1,
            "height": 1,
            "board": [[{"text": "a"}]],
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
