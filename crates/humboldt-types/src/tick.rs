//! Tick data representation.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single tick representing a quote update.
///
/// `ask >= bid` is not guaranteed by the source data and is never
/// asserted anywhere in this library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp of the tick (UTC, millisecond precision).
    pub timestamp: DateTime<Utc>,
    /// Ask (offer) price.
    pub ask: f64,
    /// Bid price.
    pub bid: f64,
    /// Volume available at the ask price.
    pub ask_volume: f32,
    /// Volume available at the bid price.
    pub bid_volume: f32,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        ask: f64,
        bid: f64,
        ask_volume: f32,
        bid_volume: f32,
    ) -> Self {
        Self {
            timestamp,
            ask,
            bid,
            ask_volume,
            bid_volume,
        }
    }

    /// Returns the mid price (average of ask and bid).
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.ask + self.bid) / 2.0
    }

    /// Returns the spread (ask - bid).
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Returns the total volume (ask + bid volume).
    #[must_use]
    pub fn total_volume(&self) -> f32 {
        self.ask_volume + self.bid_volume
    }
}

/// Raw tick as read from an hourly bi5 file (before price normalization).
///
/// The wire format stores ticks as 20 bytes in big-endian order:
/// - `u32`: milliseconds since the start of the covered hour
/// - `i32`: ask price (raw, needs division by the point value)
/// - `i32`: bid price (raw, needs division by the point value)
/// - `f32`: ask volume
/// - `f32`: bid volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTick {
    /// Milliseconds since the start of the covered hour.
    pub time_delta_ms: u32,
    /// Raw ask price.
    pub ask_raw: i32,
    /// Raw bid price.
    pub bid_raw: i32,
    /// Ask volume.
    pub ask_volume: f32,
    /// Bid volume.
    pub bid_volume: f32,
}

impl RawTick {
    /// Size in bytes of a raw tick record.
    pub const SIZE: usize = 20;

    /// Creates a new raw tick.
    #[must_use]
    pub const fn new(
        time_delta_ms: u32,
        ask_raw: i32,
        bid_raw: i32,
        ask_volume: f32,
        bid_volume: f32,
    ) -> Self {
        Self {
            time_delta_ms,
            ask_raw,
            bid_raw,
            ask_volume,
            bid_volume,
        }
    }

    /// Normalizes the raw tick into a [`Tick`] with an absolute timestamp.
    ///
    /// `hour_start` is the UTC start of the hour the source file covers.
    /// The point value converts the raw integer prices to decimals; for
    /// EUR/USD the point value is 100,000, so a raw price of 114545
    /// becomes 1.14545.
    #[must_use]
    pub fn normalize(self, hour_start: DateTime<Utc>, point_value: f64) -> Tick {
        let timestamp = hour_start + TimeDelta::milliseconds(i64::from(self.time_delta_ms));
        Tick {
            timestamp,
            ask: f64::from(self.ask_raw) / point_value,
            bid: f64::from(self.bid_raw) / point_value,
            ask_volume: self.ask_volume,
            bid_volume: self.bid_volume,
        }
    }
}
