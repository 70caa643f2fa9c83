use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    claims::{ClaimSet, ClaimantCode},
    dao::models::ClaimMatrixEntity,
    dto::validation::validate_claimant_code,
    error::ServiceError,
};

/// Body of `POST /boards/{id}/claims`.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ToggleClaimRequest {
    /// Column of the tile, starting at 0.
    #[validate(range(min = 0))]
    pub x: i64,
    /// Row of the tile, starting at 0.
    #[validate(range(min = 0))]
    pub y: i64,
    /// Claimant code of the caller, one of `1`..`8`.
    #[validate(custom(function = validate_claimant_code))]
    #[schema(example = "3")]
    pub claim: String,
}

impl ToggleClaimRequest {
    /// Split the request into typed coordinates and code.
    pub fn into_parts(self) -> Result<(u32, u32, ClaimantCode), ServiceError> {
        let x = u32::try_from(self.x)
            .map_err(|_| ServiceError::InvalidInput(format!("invalid x coordinate {}", self.x)))?;
        let y = u32::try_from(self.y)
            .map_err(|_| ServiceError::InvalidInput(format!("invalid y coordinate {}", self.y)))?;
        let code = self.claim.parse()?;
        Ok((x, y, code))
    }
}

/// Acknowledgement of a toggle. Carries no claim state.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleClaimResponse {
    /// Always `success`; failures use the error body.
    pub status: String,
    /// Human-readable acknowledgement.
    pub message: String,
}

impl ToggleClaimResponse {
    /// Acknowledgement sent after every successful toggle.
    pub fn success() -> Self {
        Self {
            status: "success".into(),
            message: "claim updated".into(),
        }
    }
}

/// Claim string of every tile, indexed `claims[y][x]`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ClaimMatrixResponse {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// One row per `y`, one claim string per `x`.
    #[schema(example = json!([["", "3"], ["12", ""]]))]
    pub claims: Vec<Vec<String>>,
}

impl From<ClaimMatrixEntity> for ClaimMatrixResponse {
    fn from(value: ClaimMatrixEntity) -> Self {
        Self {
            width: value.width,
            height: value.height,
            claims: value
                .claims
                .into_iter()
                .map(|row| row.iter().map(ClaimSet::to_string).collect())
                .collect(),
        }
    }
}
