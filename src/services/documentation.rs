use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Bingo Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::boards::list_boards,
        crate::routes::boards::create_board,
        crate::routes::boards::get_board,
        crate::routes::boards::delete_board,
        crate::routes::boards::board_tiles,
        crate::routes::claims::claim_matrix,
        crate::routes::claims::toggle_claim,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::board::CreateBoardRequest,
            crate::dto::board::BoardMetadataInput,
            crate::dto::board::TileInput,
            crate::dto::board::BoardListItem,
            crate::dto::board::BoardMetadataResponse,
            crate::dto::board::BoardTilesResponse,
            crate::dto::board::TileContentResponse,
            crate::dto::claim::ToggleClaimRequest,
            crate::dto::claim::ToggleClaimResponse,
            crate::dto::claim::ClaimMatrixResponse,
            crate::claims::ClaimMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "boards", description = "Board upload and read-only projections"),
        (name = "claims", description = "Claim polling and toggling"),
    )
)]
/// OpenAPI document of the board and claim API.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_claim_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/boards/{id}/claims"));
        assert!(doc.paths.paths.contains_key("/boards"));
    }
}
