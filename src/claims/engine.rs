//! Toggle rules turning one claimant's click into the next claim field.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{code::ClaimantCode, set::ClaimSet};

/// Claim mode of a board, fixed when the board is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimMode {
    /// A tile holds at most one claimant.
    Exclusive,
    /// A tile may hold every claimant at once.
    Multi,
}

impl ClaimMode {
    /// Whether the mode is [`ClaimMode::Multi`].
    pub fn allows_multiple_claims(self) -> bool {
        matches!(self, ClaimMode::Multi)
    }
}

impl From<bool> for ClaimMode {
    fn from(allow_multiple_claims: bool) -> Self {
        if allow_multiple_claims {
            ClaimMode::Multi
        } else {
            ClaimMode::Exclusive
        }
    }
}

/// Compute the claim field that results from `code` toggling a tile currently claimed by `current`.
///
/// In exclusive mode a claimant can only take a free tile or release their own
/// claim; toggling someone else's tile leaves it unchanged. In multi mode the
/// code is removed if present and appended otherwise.
pub fn apply_toggle(mode: ClaimMode, current: &ClaimSet, code: ClaimantCode) -> ClaimSet {
    match mode {
        ClaimMode::Exclusive => {
            if current.is_only(code) {
                ClaimSet::new()
            } else if current.is_empty() {
                ClaimSet::from(code)
            } else {
                current.clone()
            }
        }
        ClaimMode::Multi => {
            let mut next = current.clone();
            if !next.remove(code) {
                next.insert(code);
            }
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn set(raw: &str) -> ClaimSet {
        raw.parse().unwrap()
    }

    fn code(raw: char) -> ClaimantCode {
        ClaimantCode::from_char(raw).unwrap()
    }

    #[test]
    fn exclusive_free_tile_is_taken() {
        for candidate in ClaimantCode::ALL {
            let next = apply_toggle(ClaimMode::Exclusive, &ClaimSet::new(), candidate);
            assert_eq!(next, ClaimSet::from(candidate));
        }
    }

    #[test]
    fn exclusive_owner_releases_tile() {
        for candidate in ClaimantCode::ALL {
            let next = apply_toggle(ClaimMode::Exclusive, &ClaimSet::from(candidate), candidate);
            assert!(next.is_empty());
        }
    }

    #[test]
    fn exclusive_claim_cannot_be_stolen() {
        for owner in ClaimantCode::ALL {
            for other in ClaimantCode::ALL.into_iter().filter(|c| *c != owner) {
                let current = ClaimSet::from(owner);
                assert_eq!(apply_toggle(ClaimMode::Exclusive, &current, other), current);
            }
        }
    }

    #[test]
    fn exclusive_leaves_multi_owner_leftovers_alone() {
        let current = set("12");
        assert_eq!(apply_toggle(ClaimMode::Exclusive, &current, code('1')), current);
    }

    #[test]
    fn multi_appends_missing_code() {
        assert_eq!(apply_toggle(ClaimMode::Multi, &set("2"), code('5')), set("25"));
        assert_eq!(apply_toggle(ClaimMode::Multi, &set(""), code('8')), set("8"));
    }

    #[test]
    fn multi_removes_present_code_keeping_order() {
        assert_eq!(apply_toggle(ClaimMode::Multi, &set("25"), code('2')), set("5"));
        assert_eq!(
            apply_toggle(ClaimMode::Multi, &set("7316"), code('3')),
            set("716")
        );
    }

    fn members(claims: &ClaimSet) -> BTreeSet<ClaimantCode> {
        claims.iter().collect()
    }

    #[test]
    fn toggling_twice_restores_the_original_claimants() {
        let samples = ["", "1", "4", "25", "8123", "12345678"];
        for mode in [ClaimMode::Exclusive, ClaimMode::Multi] {
            for raw in samples {
                let original = set(raw);
                if mode == ClaimMode::Exclusive && original.len() > 1 {
                    continue;
                }
                for candidate in ClaimantCode::ALL {
                    let once = apply_toggle(mode, &original, candidate);
                    let twice = apply_toggle(mode, &once, candidate);
                    let context = format!("mode {mode:?}, claim {raw:?}, code {candidate}");

                    // A multi-mode re-add lands at the end, so the order only survives
                    // when the code was absent or already last.
                    let keeps_order = !original.contains(candidate)
                        || original.iter().last() == Some(candidate);
                    if keeps_order {
                        assert_eq!(twice, original, "{context}");
                    } else {
                        assert_eq!(members(&twice), members(&original), "{context}");
                    }
                }
            }
        }
    }

    #[test]
    fn multi_re_add_moves_the_code_last() {
        let original = set("25");
        let once = apply_toggle(ClaimMode::Multi, &original, code('2'));
        let twice = apply_toggle(ClaimMode::Multi, &once, code('2'));
        assert_eq!(twice.to_string(), "52");
    }

    #[test]
    fn scenario_exclusive_claim_and_release() {
        let three = code('3');
        let claimed = apply_toggle(ClaimMode::Exclusive, &ClaimSet::new(), three);
        assert_eq!(claimed.to_string(), "3");
        let released = apply_toggle(ClaimMode::Exclusive, &claimed, three);
        assert_eq!(released.to_string(), "");
    }

    #[test]
    fn scenario_multi_shared_tile() {
        let shared = apply_toggle(ClaimMode::Multi, &set("2"), code('5'));
        assert_eq!(shared.to_string(), "25");
        let after = apply_toggle(ClaimMode::Multi, &shared, code('2'));
        assert_eq!(after.to_string(), "5");
    }

    #[test]
    fn scenario_exclusive_no_steal() {
        let next = apply_toggle(ClaimMode::Exclusive, &set("4"), code('7'));
        assert_eq!(next.to_string(), "4");
    }

    #[test]
    fn mode_follows_board_flag() {
        assert_eq!(ClaimMode::from(true), ClaimMode::Multi);
        assert_eq!(ClaimMode::from(false), ClaimMode::Exclusive);
        assert!(ClaimMode::Multi.allows_multiple_claims());
    }
}
