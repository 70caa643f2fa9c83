use axum::Router;

use crate::state::SharedState;

/// Board upload, listing and projections.
pub mod boards;
/// Claim matrix and claim toggling.
pub mod claims;
/// Swagger UI and the OpenAPI document.
pub mod docs;
mod extract;
/// Health check endpoint.
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(boards::router())
        .merge(claims::router())
        .merge(docs::router())
        .with_state(state)
}
