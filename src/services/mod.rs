/// Board upload, listing and projections.
pub mod board_service;
/// Claim toggling on a single tile.
pub mod claim_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;
