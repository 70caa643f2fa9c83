use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use super::extract::{ApiJson, ApiPath};
use crate::{
    dto::board::{BoardListItem, BoardMetadataResponse, BoardTilesResponse, CreateBoardRequest},
    error::AppError,
    services::board_service,
    state::SharedState,
};

/// Board upload, listing and read-only projections.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route("/boards/{id}", get(get_board).delete(delete_board))
        .route("/boards/{id}/tiles", get(board_tiles))
}

/// List every stored board.
#[utoipa::path(
    get,
    path = "/boards",
    tag = "boards",
    responses(
        (status = 200, description = "Known boards", body = [BoardListItem]),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn list_boards(
    State(state): State<SharedState>,
) -> Result<Json<Vec<BoardListItem>>, AppError> {
    Ok(Json(board_service::list_boards(&state).await?))
}

/// Upload a finished board; every tile starts unclaimed.
#[utoipa::path(
    post,
    path = "/boards",
    tag = "boards",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created", body = BoardMetadataResponse),
        (status = 400, description = "Malformed board")
    )
)]
pub async fn create_board(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardMetadataResponse>), AppError> {
    payload.validate()?;
    let board = board_service::create_board(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

/// Retrieve the metadata of a board.
#[utoipa::path(
    get,
    path = "/boards/{id}",
    tag = "boards",
    params(("id" = Uuid, Path, description = "Board identifier")),
    responses(
        (status = 200, description = "Board metadata", body = BoardMetadataResponse),
        (status = 404, description = "Unknown board")
    )
)]
pub async fn get_board(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BoardMetadataResponse>, AppError> {
    Ok(Json(board_service::get_board(&state, id).await?))
}

/// Delete a board together with its tiles.
#[utoipa::path(
    delete,
    path = "/boards/{id}",
    tag = "boards",
    params(("id" = Uuid, Path, description = "Board identifier")),
    responses(
        (status = 204, description = "Board deleted"),
        (status = 404, description = "Unknown board")
    )
)]
pub async fn delete_board(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    board_service::delete_board(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Retrieve the static content of every tile, indexed `[y][x]`.
#[utoipa::path(
    get,
    path = "/boards/{id}/tiles",
    tag = "boards",
    params(("id" = Uuid, Path, description = "Board identifier")),
    responses(
        (status = 200, description = "Tile contents", body = BoardTilesResponse),
        (status = 404, description = "Unknown board")
    )
)]
pub async fn board_tiles(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BoardTilesResponse>, AppError> {
    Ok(Json(board_service::board_tiles(&state, id).await?))
}
