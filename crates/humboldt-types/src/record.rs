//! The unified stream item type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Bar, Tick};

/// A single market observation: a raw tick or an OHLCV bar.
///
/// This is the item type of the record stream; which variant is emitted
/// depends on the requested granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Record {
    /// A raw tick.
    Tick(Tick),
    /// An OHLCV bar.
    Bar(Bar),
}

impl Record {
    /// Returns the record's timestamp (UTC).
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Tick(tick) => tick.timestamp,
            Self::Bar(bar) => bar.timestamp,
        }
    }

    /// Returns the inner tick, if this record is one.
    #[must_use]
    pub const fn as_tick(&self) -> Option<&Tick> {
        match self {
            Self::Tick(tick) => Some(tick),
            Self::Bar(_) => None,
        }
    }

    /// Returns the inner bar, if this record is one.
    #[must_use]
    pub const fn as_bar(&self) -> Option<&Bar> {
        match self {
            Self::Bar(bar) => Some(bar),
            Self::Tick(_) => None,
        }
    }
}

impl From<Tick> for Record {
    fn from(tick: Tick) -> Self {
        Self::Tick(tick)
    }
}

impl From<Bar> for Record {
    fn from(bar: Bar) -> Self {
        Self::Bar(bar)
    }
}
