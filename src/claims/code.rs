use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// One of the eight self-assigned claimant identifiers, written `'1'` to `'8'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[allow(missing_docs)]
pub enum ClaimantCode {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

/// Raised when a character or string is not a valid claimant code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCode {
    /// The string is empty or longer than one character.
    #[error("claimant code must be exactly one character, got {0:?}")]
    Length(String),
    /// The character is not `1`..`8`.
    #[error("unknown claimant code {0:?}, expected '1'..='8'")]
    Unknown(char),
}

impl ClaimantCode {
    /// Every code in alphabet order.
    pub const ALL: [ClaimantCode; 8] = [
        ClaimantCode::One,
        ClaimantCode::Two,
        ClaimantCode::Three,
        ClaimantCode::Four,
        ClaimantCode::Five,
        ClaimantCode::Six,
        ClaimantCode::Seven,
        ClaimantCode::Eight,
    ];

    /// Parse a single code character.
    pub fn from_char(value: char) -> Result<Self, InvalidCode> {
        match value {
            '1' => Ok(Self::One),
            '2' => Ok(Self::Two),
            '3' => Ok(Self::Three),
            '4' => Ok(Self::Four),
            '5' => Ok(Self::Five),
            '6' => Ok(Self::Six),
            '7' => Ok(Self::Seven),
            '8' => Ok(Self::Eight),
            other => Err(InvalidCode::Unknown(other)),
        }
    }

    /// Character used on the wire and in storage.
    pub fn as_char(self) -> char {
        match self {
            Self::One => '1',
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
        }
    }
}

impl fmt::Display for ClaimantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ClaimantCode {
    type Err = InvalidCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(single), None) => Self::from_char(single),
            _ => Err(InvalidCode::Length(value.to_owned())),
        }
    }
}

impl Serialize for ClaimantCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClaimantCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_code_of_the_alphabet() {
        for (index, code) in ClaimantCode::ALL.iter().enumerate() {
            let raw = char::from(b'1' + index as u8);
            assert_eq!(ClaimantCode::from_char(raw), Ok(*code));
            assert_eq!(code.as_char(), raw);
        }
    }

    #[test]
    fn rejects_codes_outside_the_alphabet() {
        assert_eq!("0".parse::<ClaimantCode>(), Err(InvalidCode::Unknown('0')));
        assert_eq!("9".parse::<ClaimantCode>(), Err(InvalidCode::Unknown('9')));
        assert!(matches!(
            "12".parse::<ClaimantCode>(),
            Err(InvalidCode::Length(_))
        ));
        assert!(matches!(
            "".parse::<ClaimantCode>(),
            Err(InvalidCode::Length(_))
        ));
    }

    #[test]
    fn default_code_is_one() {
        assert_eq!(ClaimantCode::default().as_char(), '1');
    }

    #[test]
    fn serde_uses_the_single_character_form() {
        let json = serde_json::to_string(&ClaimantCode::Five).unwrap();
        assert_eq!(json, "\"5\"");
        let back: ClaimantCode = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back, ClaimantCode::Seven);
        assert!(serde_json::from_str::<ClaimantCode>("\"x\"").is_err());
    }
}
