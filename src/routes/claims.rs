use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use super::extract::{ApiJson, ApiPath};
use crate::{
    dto::claim::{ClaimMatrixResponse, ToggleClaimRequest, ToggleClaimResponse},
    error::AppError,
    services::{board_service, claim_service},
    state::SharedState,
};

/// Claim matrix polling and claim toggling.
pub fn router() -> Router<SharedState> {
    Router::new().route("/boards/{id}/claims", get(claim_matrix).post(toggle_claim))
}

/// Retrieve the claim string of every tile, indexed `[y][x]`.
#[utoipa::path(
    get,
    path = "/boards/{id}/claims",
    tag = "claims",
    params(("id" = Uuid, Path, description = "Board identifier")),
    responses(
        (status = 200, description = "Claim matrix", body = ClaimMatrixResponse),
        (status = 404, description = "Unknown board"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn claim_matrix(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ClaimMatrixResponse>, AppError> {
    Ok(Json(board_service::claim_matrix(&state, id).await?))
}

/// Toggle the caller's claim on one tile.
///
/// The acknowledgement carries no state; clients poll the claim matrix afterwards.
#[utoipa::path(
    post,
    path = "/boards/{id}/claims",
    tag = "claims",
    params(("id" = Uuid, Path, description = "Board identifier")),
    request_body = ToggleClaimRequest,
    responses(
        (status = 200, description = "Claim toggled", body = ToggleClaimResponse),
        (status = 400, description = "Invalid coordinates or claimant code"),
        (status = 404, description = "Unknown board or tile"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn toggle_claim(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ToggleClaimRequest>,
) -> Result<Json<ToggleClaimResponse>, AppError> {
    payload.validate()?;
    let (x, y, code) = payload.into_parts()?;
    claim_service::toggle_claim(&state, id, x, y, code).await?;
    Ok(Json(ToggleClaimResponse::success()))
}
