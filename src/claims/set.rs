//! Ordered set of claimant codes stored on a tile.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use super::code::{ClaimantCode, InvalidCode};

/// Claim field of a tile: at most eight distinct codes kept in arrival order.
///
/// The compact string form (`""`, `"3"`, `"25"`) is what storage and the wire
/// carry; [`ClaimSet`] is the only place that string is spliced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClaimSet {
    codes: Vec<ClaimantCode>,
}

/// Raised when a stored or submitted claim string is not a valid claim set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidClaim {
    /// A character is not a claimant code.
    #[error(transparent)]
    Code(#[from] InvalidCode),
    /// A code is listed twice.
    #[error("claimant code {0} appears more than once")]
    Duplicate(ClaimantCode),
}

impl ClaimSet {
    /// Empty (unclaimed) set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a claim string, skipping unknown characters and repeated codes.
    ///
    /// Used by viewers that must render whatever the server hands out.
    pub fn parse_lenient(raw: &str) -> Self {
        let mut set = Self::new();
        for code in raw.chars().filter_map(|c| ClaimantCode::from_char(c).ok()) {
            set.insert(code);
        }
        set
    }

    /// Whether `code` holds a claim.
    pub fn contains(&self, code: ClaimantCode) -> bool {
        self.codes.contains(&code)
    }

    /// Append `code` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, code: ClaimantCode) -> bool {
        if self.contains(code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Remove `code`, keeping the order of the remaining codes. Returns whether it was present.
    pub fn remove(&mut self, code: ClaimantCode) -> bool {
        match self.codes.iter().position(|existing| *existing == code) {
            Some(index) => {
                self.codes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of claimants.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the tile is unclaimed.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = ClaimantCode> + '_ {
        self.codes.iter().copied()
    }

    /// True when the set holds exactly `code` and nothing else.
    pub fn is_only(&self, code: ClaimantCode) -> bool {
        self.codes.as_slice() == [code]
    }
}

impl From<ClaimantCode> for ClaimSet {
    fn from(code: ClaimantCode) -> Self {
        Self { codes: vec![code] }
    }
}

impl fmt::Display for ClaimSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.codes.iter().try_for_each(|code| write!(f, "{code}"))
    }
}

impl FromStr for ClaimSet {
    type Err = InvalidClaim;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut set = Self::new();
        for c in raw.chars() {
            let code = ClaimantCode::from_char(c)?;
            if !set.insert(code) {
                return Err(InvalidClaim::Duplicate(code));
            }
        }
        Ok(set)
    }
}

impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
