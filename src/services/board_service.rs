//! Board record operations backing the REST surface.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{BoardEntity, TileEntity},
    dto::{
        board::{BoardListItem, BoardMetadataResponse, BoardTilesResponse, CreateBoardRequest},
        claim::ClaimMatrixResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// List every stored board.
pub async fn list_boards(state: &SharedState) -> Result<Vec<BoardListItem>, ServiceError> {
    let store = state.require_board_store().await?;
    let boards = store.list_boards().await?;
    Ok(boards.into_iter().map(Into::into).collect())
}

/// Persist an uploaded board with every tile unclaimed.
pub async fn create_board(
    state: &SharedState,
    request: CreateBoardRequest,
) -> Result<BoardMetadataResponse, ServiceError> {
    let (board, tiles) = build_board(request, state.config().max_board_side())?;

    let store = state.require_board_store().await?;
    store.create_board(board.clone(), tiles).await?;

    info!(
        board_id = %board.id,
        width = board.width,
        height = board.height,
        allow_multiple_claims = board.allow_multiple_claims,
        "board created"
    );
    Ok(board.into())
}

/// Metadata of one board.
pub async fn get_board(state: &SharedState, id: Uuid) -> Result<BoardMetadataResponse, ServiceError> {
    let store = state.require_board_store().await?;
    let Some(board) = store.find_board(id).await? else {
        return Err(board_not_found(id));
    };
    Ok(board.into())
}

/// Remove a board and all of its tiles.
pub async fn delete_board(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_board_store().await?;
    if !store.delete_board(id).await? {
        return Err(board_not_found(id));
    }
    info!(board_id = %id, "board deleted");
    Ok(())
}

/// Text, tooltip and difficulty of every tile.
pub async fn board_tiles(state: &SharedState, id: Uuid) -> Result<BoardTilesResponse, ServiceError> {
    let store = state.require_board_store().await?;
    let Some(tiles) = store.board_tiles(id).await? else {
        return Err(board_not_found(id));
    };
    Ok(tiles.into())
}

/// Current claim of every tile.
pub async fn claim_matrix(state: &SharedState, id: Uuid) -> Result<ClaimMatrixResponse, ServiceError> {
    let store = state.require_board_store().await?;
    let Some(matrix) = store.claim_matrix(id).await? else {
        return Err(board_not_found(id));
    };
    Ok(matrix.into())
}

fn build_board(
    request: CreateBoardRequest,
    max_side: u32,
) -> Result<(BoardEntity, Vec<TileEntity>), ServiceError> {
    let CreateBoardRequest {
        metadata,
        difficulty,
        width,
        height,
        board: columns,
        allow_multiple_claims,
    } = request;

    if width == 0 || height == 0 || width > max_side || height > max_side {
        return Err(ServiceError::InvalidInput(format!(
            "board dimensions must be between 1 and {max_side} (got {width}x{height})"
        )));
    }
    if columns.len() != width as usize {
        return Err(ServiceError::InvalidInput(format!(
            "board has {} columns but width is {width}",
            columns.len()
        )));
    }
    if let Some(x) = columns.iter().position(|column| column.len() != height as usize) {
        return Err(ServiceError::InvalidInput(format!(
            "column {x} has {} tiles but height is {height}",
            columns[x].len()
        )));
    }

    let board = BoardEntity {
        id: Uuid::new_v4(),
        title: metadata.title,
        description: metadata.description,
        game: metadata.game,
        version: metadata.version,
        authors: metadata.authors.join(","),
        difficulty,
        width,
        height,
        allow_multiple_claims,
        created_at: SystemTime::now(),
    };

    let tiles = (0..width)
        .zip(columns)
        .flat_map(|(x, column)| {
            (0..height)
                .zip(column)
                .map(move |(y, tile)| TileEntity::new(x, y, tile.text, tile.tooltip, tile.difficulty))
        })
        .collect();

    Ok((board, tiles))
}

fn board_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("board `{id}` not found"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        claims::ClaimMode, config::AppConfig, dao::board_store::MemoryBoardStore, state::AppState,
    };

    fn request(width: u32, height: u32, columns: usize, column_len: usize) -> CreateBoardRequest {
        let column: Vec<_> = (0..column_len)
            .map(|y| serde_json::json!({"text": format!("tile {y}")}))
            .collect();
        serde_json::from_value(serde_json::json!({
            "metadata": {"title": "Any%", "authors": ["ana", "bo"], "game": "Celeste"},
            "width": width,
            "height": height,
            "board": vec![column; columns],
            "allow_multiple_claims": true,
        }))
        .unwrap()
    }

    fn state() -> SharedState {
        AppState::with_store(AppConfig::default(), Arc::new(MemoryBoardStore::new()))
    }

    #[tokio::test]
    async fn created_board_has_unclaimed_tiles_in_column_order() {
        let state = state();
        let created = create_board(&state, request(3, 2, 3, 2)).await.unwrap();
        assert_eq!(created.authors, "ana,bo");
        assert_eq!(created.claim_mode, ClaimMode::Multi);

        let tiles = board_tiles(&state, created.id).await.unwrap();
        assert_eq!(tiles.tiles.len(), 2);
        assert_eq!(tiles.tiles[1][2].text, "tile 1");

        let matrix = claim_matrix(&state, created.id).await.unwrap();
        assert_eq!((matrix.width, matrix.height), (3, 2));
        assert!(matrix.claims.iter().flatten().all(String::is_empty));
    }

    #[tokio::test]
    async fn shape_mismatch_is_rejected() {
        let state = state();
        for bad in [request(3, 2, 2, 2), request(2, 2, 2, 3), request(40, 1, 40, 1)] {
            let err = create_board(&state, bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
        assert!(list_boards(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ragged_columns_are_rejected() {
        let state = state();
        let mut ragged = request(2, 2, 2, 2);
        ragged.board[1].pop();
        let err = create_board(&state, ragged).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(message) if message.contains("column 1")));
    }

    #[tokio::test]
    async fn deleted_board_is_gone() {
        let state = state();
        let created = create_board(&state, request(1, 1, 1, 1)).await.unwrap();
        assert_eq!(list_boards(&state).await.unwrap().len(), 1);

        delete_board(&state, created.id).await.unwrap();
        assert!(matches!(
            get_board(&state, created.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            delete_board(&state, created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
