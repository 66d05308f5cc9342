//! OHLCV bar data representation.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// An OHLCV bar (candlestick) decoded from a remote candle file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time (start of the period, UTC).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume over the period.
    pub volume: f32,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f32,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Raw bar as read from a candle bi5 file (before price normalization).
///
/// The wire format stores bars as 24 bytes in big-endian order:
/// - `i32`: seconds since the start of the file's covering period
/// - `i32`: open price (raw)
/// - `i32`: high price (raw)
/// - `i32`: low price (raw)
/// - `i32`: close price (raw)
/// - `f32`: volume
///
/// The covering period depends on the file granularity: minute files
/// cover a UTC day, hour files a UTC month, day files a UTC year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBar {
    /// Seconds since the start of the file's covering period.
    pub time_delta_secs: i32,
    /// Raw open price.
    pub open_raw: i32,
    /// Raw high price.
    pub high_raw: i32,
    /// Raw low price.
    pub low_raw: i32,
    /// Raw close price.
    pub close_raw: i32,
    /// Traded volume.
    pub volume: f32,
}

impl RawBar {
    /// Size in bytes of a raw bar record.
    pub const SIZE: usize = 24;

    /// Creates a new raw bar.
    #[must_use]
    pub const fn new(
        time_delta_secs: i32,
        open_raw: i32,
        high_raw: i32,
        low_raw: i32,
        close_raw: i32,
        volume: f32,
    ) -> Self {
        Self {
            time_delta_secs,
            open_raw,
            high_raw,
            low_raw,
            close_raw,
            volume,
        }
    }

    /// Normalizes the raw bar into a [`Bar`] with an absolute timestamp.
    ///
    /// `base` is the UTC start of the file's covering period. The output
    /// always satisfies `high >= max(open, close, low)` and
    /// `low <= min(open, close, high)`; raw records that violate the
    /// hull are widened rather than rejected.
    #[must_use]
    pub fn normalize(self, base: DateTime<Utc>, point_value: f64) -> Bar {
        let timestamp = base + TimeDelta::seconds(i64::from(self.time_delta_secs));
        let open = f64::from(self.open_raw) / point_value;
        let high = f64::from(self.high_raw) / point_value;
        let low = f64::from(self.low_raw) / point_value;
        let close = f64::from(self.close_raw) / point_value;
        Bar {
            timestamp,
            open,
            high: high.max(open).max(close).max(low),
            low: low.min(open).min(close).min(high),
            close,
            volume: self.volume,
        }
    }
}
