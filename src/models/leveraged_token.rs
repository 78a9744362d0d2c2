//! Leveraged token venues polled for the leverage pages
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenVenue {
    /// TLX leveraged tokens (Optimism), REST price API
    Tlx,

    /// Toros/dHEDGE bull tokens, GraphQL candle API
    Toros,
}

impl TokenVenue {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenVenue::Tlx => "tlx",
            TokenVenue::Toros => "toros",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "tlx" => Ok(TokenVenue::Tlx),
            "toros" => Ok(TokenVenue::Toros),
            _ => Err(format!("Invalid venue: '{}'. Valid values: tlx, toros", s)),
        }
    }
}

impl fmt::Display for TokenVenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Daily close of a Toros token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorosPricePoint {
    /// RFC 3339 with milliseconds, e.g. `2024-05-01T00:00:00.000Z`
    pub timestamp: String,
    /// Close price in USD (on-chain value scaled down by 1e18)
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_from_str() {
        assert_eq!(TokenVenue::from_str("TLX").unwrap(), TokenVenue::Tlx);
        assert_eq!(TokenVenue::from_str("toros").unwrap(), TokenVenue::Toros);
        assert!(TokenVenue::from_str("gmx").is_err());
    }
}
