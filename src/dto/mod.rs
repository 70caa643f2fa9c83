use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Board upload and read-only board projections.
pub mod board;
/// Claim toggling and the claim matrix.
pub mod claim;
/// Health check payloads.
pub mod health;
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
