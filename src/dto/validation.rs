//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::claims::ClaimantCode;

/// Validates that a claimant code is exactly one character in `'1'..='8'`.
///
/// # Examples
///
/// ```ignore
/// validate_claimant_code("3")  // Ok
/// validate_claimant_code("9")  // Err - outside the palette
/// validate_claimant_code("12") // Err - too long
/// ```
pub fn validate_claimant_code(code: &str) -> Result<(), ValidationError> {
    if code.chars().count() != 1 {
        let mut err = ValidationError::new("claim_length");
        err.message = Some(
            format!(
                "Claim must be exactly one character (got {})",
                code.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    if code.parse::<ClaimantCode>().is_err() {
        let mut err = ValidationError::new("claim_format");
        err.message = Some("Claim must be a digit between 1 and 8".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_claimant_code_valid() {
        for code in ["1", "2", "5", "8"] {
            assert!(validate_claimant_code(code).is_ok(), "{code}");
        }
    }

    #[test]
    fn test_validate_claimant_code_invalid_length() {
        assert!(validate_claimant_code("").is_err());
        assert!(validate_claimant_code("12").is_err());
    }

    #[test]
    fn test_validate_claimant_code_invalid_format() {
        assert!(validate_claimant_code("0").is_err());
        assert!(validate_claimant_code("9").is_err());
        assert!(validate_claimant_code("a").is_err());
        assert!(validate_claimant_code("é").is_err());
    }
}
