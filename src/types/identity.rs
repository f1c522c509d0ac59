use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The (coin, pair) key every provider query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentity {
    pub coin_address: String,
    pub pair_address: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid identity: coin and pair address are both required")]
    InvalidIdentity,
}

impl TokenIdentity {
    /// Builds an identity, refusing partial input.
    pub fn new(coin_address: &str, pair_address: &str) -> Result<Self, IdentityError> {
        Self {
            coin_address: coin_address.to_string(),
            pair_address: pair_address.to_string(),
        }
        .normalized()
    }

    /// Trims surrounding whitespace from both addresses, then rejects the
    /// identity if either one is empty.
    pub fn normalized(self) -> Result<Self, IdentityError> {
        let coin_address = self.coin_address.trim();
        let pair_address = self.pair_address.trim();
        if coin_address.is_empty() || pair_address.is_empty() {
            return Err(IdentityError::InvalidIdentity);
        }
        Ok(Self {
            coin_address: coin_address.to_string(),
            pair_address: pair_address.to_string(),
        })
    }

    pub fn query_params(&self) -> [(&'static str, &str); 2] {
        [
            ("coinAddress", self.coin_address.as_str()),
            ("pairAddress", self.pair_address.as_str()),
        ]
    }
}

impl fmt::Display for TokenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.coin_address, self.pair_address)
    }
}

/// Identity plus the refresh generation it was issued under. Every in-flight
/// provider call carries one; the store only accepts writes whose stamp is
/// still current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestStamp {
    pub identity: TokenIdentity,
    pub generation: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_fields() {
        assert_eq!(TokenIdentity::new("", "0xBBB"), Err(IdentityError::InvalidIdentity));
        assert_eq!(TokenIdentity::new("0xAAA", ""), Err(IdentityError::InvalidIdentity));
        assert_eq!(TokenIdentity::new("  ", "0xBBB"), Err(IdentityError::InvalidIdentity));
    }

    #[test]
    fn test_equality_is_structural() {
        let a = TokenIdentity::new("0xAAA", "0xBBB").unwrap();
        let b = TokenIdentity::new(" 0xAAA ", "0xBBB").unwrap();
        let c = TokenIdentity::new("0xAAA", "0xCCC").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_normalized_trims_stored_fields() {
        let raw = TokenIdentity { coin_address: " 0xAAA\t".into(), pair_address: "0xBBB ".into() };
        let id = raw.normalized().unwrap();
        assert_eq!(id.coin_address, "0xAAA");
        assert_eq!(id.pair_address, "0xBBB");
        assert_eq!(id, TokenIdentity::new("0xAAA", "0xBBB").unwrap());

        let blank = TokenIdentity { coin_address: "0xAAA".into(), pair_address: " ".into() };
        assert_eq!(blank.normalized(), Err(IdentityError::InvalidIdentity));
    }

    #[test]
    fn test_serializes_camel_case() {
        let id = TokenIdentity::new("0xAAA", "0xBBB").unwrap();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["coinAddress"], "0xAAA");
        assert_eq!(json["pairAddress"], "0xBBB");
    }
}
