use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

/// A deployed contract address: `0x` followed by exactly 40 hex digits.
///
/// Casing is preserved as written (checksummed addresses stay
/// checksummed in reports), comparisons through [`Address::same_as`]
/// ignore it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub(crate) String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("[E010] '{0}' is not a valid contract address\n\nSuggestions:\n  • Expected format: 0x followed by 40 hexadecimal characters\n  • Example: 0xFBf7B5d91297aC0b0b2D184af0b9F81FE053819a\n  • Check that the address starts with '0x'\n  • Copy the address from the deployment output to avoid typos")]
    Match(String),
    #[error("Address regex error")]
    Regex(#[from] regex::Error),
}

impl AddressError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Match(_) => "E010",
            Self::Regex(_) => "E011",
        }
    }
}

impl Address {
    const PATTERN: &'static str = r"^0x[a-fA-F0-9]{40}$";

    /// # Errors
    ///
    /// Will fail if `raw` isn't "0x" followed by 40 hexadecimal digits.
    pub fn new(raw: &str) -> Result<Self, AddressError> {
        let re = Regex::new(Self::PATTERN)?;

        if re.is_match(raw) {
            Ok(Self(raw.into()))
        } else {
            Err(AddressError::Match(raw.to_string()))
        }
    }

    /// Case-insensitive comparison, `0xabc...` and `0xABC...` are the same account.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BNOU_TESTNET: &str = "0xFBf7B5d91297aC0b0b2D184af0b9F81FE053819a";

    #[test]
    fn test_valid_checksummed_address() {
        assert!(Address::new(BNOU_TESTNET).is_ok());
    }

    #[test]
    fn test_valid_lowercase_address() {
        assert!(Address::new("0x4f47f066d839634bf4e992021a65d209b383ee1e").is_ok());
    }

    #[test]
    fn test_invalid_address_no_prefix() {
        assert!(Address::new("FBf7B5d91297aC0b0b2D184af0b9F81FE053819a").is_err());
    }

    #[test]
    fn test_invalid_address_too_short() {
        assert!(Address::new("0xFBf7B5d91297aC0b0b2D184af0b9F81FE05381").is_err());
    }

    #[test]
    fn test_invalid_address_too_long() {
        assert!(Address::new("0xFBf7B5d91297aC0b0b2D184af0b9F81FE053819a00").is_err());
    }

    #[test]
    fn test_invalid_address_non_hex() {
        assert!(Address::new("0xZZf7B5d91297aC0b0b2D184af0b9F81FE053819a").is_err());
    }

    #[test]
    fn test_empty_address() {
        assert!(Address::new("").is_err());
    }

    #[test]
    fn test_display_preserves_casing() {
        let address = Address::new(BNOU_TESTNET).unwrap();
        assert_eq!(format!("{address}"), BNOU_TESTNET);
    }

    #[test]
    fn test_same_as_ignores_casing() {
        let checksummed = Address::new(BNOU_TESTNET).unwrap();
        let lower = Address::new(&BNOU_TESTNET.to_lowercase()).unwrap();
        assert_ne!(checksummed, lower);
        assert!(checksummed.same_as(&lower));
    }

    #[test]
    fn test_error_carries_code_and_suggestions() {
        let error = Address::new("0x123").unwrap_err();
        assert_eq!(error.error_code(), "E010");
        let message = format!("{error}");
        assert!(message.contains("'0x123' is not a valid contract address"));
        assert!(message.contains("Suggestions:"));
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let parsed: Result<Address, _> = serde_json::from_str("\"0xnope\"");
        assert!(parsed.is_err());

        let parsed: Address = serde_json::from_str(&format!("\"{BNOU_TESTNET}\"")).unwrap();
        assert_eq!(parsed.as_ref(), BNOU_TESTNET);
    }
}
