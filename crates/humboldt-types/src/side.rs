//! Price side definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ValidationError;

/// The price side of the requested data.
///
/// Ticks always carry both sides regardless of this setting. Bars are
/// published per side by the remote; `Mid` is derived locally from a
/// bid fetch and an ask fetch of the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bid prices.
    #[default]
    Bid,
    /// Ask prices.
    Ask,
    /// Mid prices, averaged from bid and ask.
    Mid,
}

impl Side {
    /// Returns the side as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
            Self::Mid => "mid",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bid" => Ok(Self::Bid),
            "ask" => Ok(Self::Ask),
            "mid" => Ok(Self::Mid),
            _ => Err(ValidationError::InvalidPriceType(s.to_string())),
        }
    }
}

/// One of the two sides the remote actually publishes candle files for.
///
/// [`Side::Mid`] has no remote representation; it resolves to a
/// [`BookSide::Bid`] fetch plus a [`BookSide::Ask`] fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    /// The bid side.
    Bid,
    /// The ask side.
    Ask,
}

impl BookSide {
    /// Uppercase path segment used in remote candle file names.
    #[must_use]
    pub const fn remote_segment(&self) -> &'static str {
        match self {
            Self::Bid => "BID",
            Self::Ask => "ASK",
        }
    }
}
