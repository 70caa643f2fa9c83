use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::claims::{ClaimMode, ClaimSet};

/// Board metadata persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardEntity {
    /// Stable identifier for the board.
    pub id: Uuid,
    /// Board title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Game the challenges refer to.
    pub game: String,
    /// Version of the challenge list.
    pub version: String,
    /// Authors joined with `,`.
    pub authors: String,
    /// Average difficulty computed by the board generator.
    pub difficulty: f64,
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
    /// Claim mode switch, fixed at creation.
    pub allow_multiple_claims: bool,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
}

impl BoardEntity {
    /// Claim mode derived from `allow_multiple_claims`.
    pub fn mode(&self) -> ClaimMode {
        self.allow_multiple_claims.into()
    }

    /// Whether `(x, y)` addresses a tile of this board.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

/// Single grid cell with its static content and mutable claim field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileEntity {
    /// Column, `0..width`.
    pub x: u32,
    /// Row, `0..height`.
    pub y: u32,
    /// Challenge shown on the tile.
    pub text: String,
    /// Longer explanation shown on hover.
    pub tooltip: String,
    /// Difficulty of this challenge.
    pub difficulty: f64,
    /// Claimants currently holding the tile, in arrival order.
    pub claim: ClaimSet,
}

impl TileEntity {
    /// Unclaimed tile at `(x, y)`.
    pub fn new(x: u32, y: u32, text: String, tooltip: String, difficulty: f64) -> Self {
        Self {
            x,
            y,
            text,
            tooltip,
            difficulty,
            claim: ClaimSet::new(),
        }
    }

    /// Static content of the tile.
    pub fn content(&self) -> TileContentEntity {
        TileContentEntity {
            text: self.text.clone(),
            tooltip: self.tooltip.clone(),
            difficulty: self.difficulty,
        }
    }
}

/// Static content of a tile, without its claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileContentEntity {
    /// Challenge shown on the tile.
    pub text: String,
    /// Longer explanation shown on hover.
    pub tooltip: String,
    /// Difficulty of this challenge.
    pub difficulty: f64,
}

/// Summary projection used when listing boards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSummaryEntity {
    /// Board identifier.
    pub id: Uuid,
    /// Board title.
    pub title: String,
    /// Board description.
    pub description: String,
}

impl From<&BoardEntity> for BoardSummaryEntity {
    fn from(board: &BoardEntity) -> Self {
        Self {
            id: board.id,
            title: board.title.clone(),
            description: board.description.clone(),
        }
    }
}

/// Snapshot of every tile's claim on a board, indexed `claims[y][x]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimMatrixEntity {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// One row per `y`.
    pub claims: Vec<Vec<ClaimSet>>,
}

impl ClaimMatrixEntity {
    /// Assemble the matrix of `board` from its tiles; cells without a tile stay unclaimed.
    pub fn from_tiles<'a>(board: &BoardEntity, tiles: impl IntoIterator<Item = &'a TileEntity>) -> Self {
        let claims = grid(
            board,
            tiles.into_iter().map(|tile| (tile.x, tile.y, tile.claim.clone())),
        );
        Self {
            width: board.width,
            height: board.height,
            claims,
        }
    }
}

/// Static content of every tile on a board, indexed `tiles[y][x]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardTilesEntity {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// One row per `y`.
    pub tiles: Vec<Vec<TileContentEntity>>,
}

impl BoardTilesEntity {
    /// Assemble the content grid of `board` from its tiles.
    pub fn from_tiles<'a>(board: &BoardEntity, tiles: impl IntoIterator<Item = &'a TileEntity>) -> Self {
        let tiles = grid(
            board,
            tiles.into_iter().map(|tile| (tile.x, tile.y, tile.content())),
        );
        Self {
            width: board.width,
            height: board.height,
            tiles,
        }
    }
}

fn grid<T: Clone + Default>(
    board: &BoardEntity,
    cells: impl Iterator<Item = (u32, u32, T)>,
) -> Vec<Vec<T>> {
    let mut rows = vec![vec![T::default(); board.width as usize]; board.height as usize];
    for (x, y, value) in cells {
        if board.contains(x, y) {
            rows[y as usize][x as usize] = value;
        }
    }
    rows
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Board of `width × height` unclaimed tiles labelled `"x,y"`.
    pub fn board(width: u32, height: u32, allow_multiple_claims: bool) -> (BoardEntity, Vec<TileEntity>) {
        let board = BoardEntity {
            id: Uuid::new_v4(),
            title: "Speedrun bingo".into(),
            description: "Mark what you did".into(),
            game: "Celeste".into(),
            version: "1.4".into(),
            authors: "tester".into(),
            difficulty: 2.5,
            width,
            height,
            allow_multiple_claims,
            created_at: SystemTime::now(),
        };
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| TileEntity::new(x, y, format!("{x},{y}"), String::new(), 1.0))
            .collect();
        (board, tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_indexed_by_row_then_column() {
        let (board, mut tiles) = fixtures::board(3, 2, true);
        tiles[5].claim = "27".parse().unwrap(); // x = 2, y = 1
        let matrix = ClaimMatrixEntity::from_tiles(&board, &tiles);

        assert_eq!(matrix.claims.len(), 2);
        assert_eq!(matrix.claims[0].len(), 3);
        assert_eq!(matrix.claims[1][2].to_string(), "27");
        assert!(matrix.claims[0][2].is_empty());
    }

    #[test]
    fn tiles_outside_the_board_are_ignored() {
        let (board, mut tiles) = fixtures::board(1, 1, false);
        tiles.push(TileEntity::new(4, 4, "stray".into(), String::new(), 0.0));
        let grid = BoardTilesEntity::from_tiles(&board, &tiles);
        assert_eq!(grid.tiles, vec![vec![tiles[0].content()]]);
    }
}
