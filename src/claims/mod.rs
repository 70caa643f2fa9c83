//! Claim-state model: claimant codes, claim sets, toggle rules and rendering.

/// Claimant codes `1` to `8`.
pub mod code;
pub mod engine;
pub mod render;
pub mod set;

pub use code::{ClaimantCode, InvalidCode};
pub use engine::{ClaimMode, apply_toggle};
pub use render::{ClaimColor, ClaimStyle, GradientSegment, render, render_raw};
pub use set::{ClaimSet, InvalidClaim};
