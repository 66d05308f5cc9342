//! Request granularity definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ValidationError;

/// The granularity of the requested data.
///
/// This is also used as the *fetch* granularity of a single remote file,
/// which may be finer than the requested granularity when the planner
/// falls back for an in-progress period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Raw ticks (no aggregation).
    Ticks,
    /// 1-minute bars.
    #[serde(rename = "m1")]
    Minute,
    /// 1-hour bars.
    #[serde(rename = "h1")]
    Hour,
    /// Daily bars.
    #[default]
    #[serde(rename = "d1")]
    Day,
}

impl Granularity {
    /// Returns the bar period in seconds, or `None` for ticks.
    #[must_use]
    pub const fn seconds(&self) -> Option<u64> {
        match self {
            Self::Ticks => None,
            Self::Minute => Some(60),
            Self::Hour => Some(3600),
            Self::Day => Some(86_400),
        }
    }

    /// Returns true if this is tick data.
    #[must_use]
    pub const fn is_ticks(&self) -> bool {
        matches!(self, Self::Ticks)
    }

    /// Returns the granularity as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ticks => "ticks",
            Self::Minute => "m1",
            Self::Hour => "h1",
            Self::Day => "d1",
        }
    }

    /// Returns all granularities.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Ticks, Self::Minute, Self::Hour, Self::Day]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ticks" | "tick" => Ok(Self::Ticks),
            "m1" | "1m" | "minute" => Ok(Self::Minute),
            "h1" | "1h" | "hour" => Ok(Self::Hour),
            "d1" | "1d" | "day" | "daily" => Ok(Self::Day),
            _ => Err(ValidationError::InvalidGranularity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds() {
        assert_eq!(Granularity::Ticks.seconds(), None);
        assert_eq!(Granularity::Minute.seconds(), Some(60));
        assert_eq!(Granularity::Hour.seconds(), Some(3600));
        assert_eq!(Granularity::Day.seconds(), Some(86_400));
    }

    #[test]
    fn test_parse() {
        assert_eq!("ticks".parse::<Granularity>().unwrap(), Granularity::Ticks);
        assert_eq!("m1".parse::<Granularity>().unwrap(), Granularity::Minute);
        assert_eq!("1h".parse::<Granularity>().unwrap(), Granularity::Hour);
        assert_eq!("Daily".parse::<Granularity>().unwrap(), Granularity::Day);
        assert!(matches!(
            "weekly".parse::<Granularity>(),
            Err(ValidationError::InvalidGranularity(_))
        ));
    }
}
