//! Library crate for bingo-back, exposing modules for binaries and integration tests.

pub mod claims;
#[cfg(feature = "sync-client")]
pub mod client;
pub mod config;
/// Persistence layer: entities, storage errors and board store backends.
pub mod dao;
/// Request and response bodies of the REST API.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers and handlers.
pub mod routes;
/// Business logic invoked by the handlers.
pub mod services;
/// Shared application state.
pub mod state;
