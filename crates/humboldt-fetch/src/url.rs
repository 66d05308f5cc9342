//! Dukascopy URL construction.
//!
//! The remote encodes months zero-indexed (`January = 00`); that quirk
//! stays confined to this module. Days and hours are two-digit
//! zero-padded, years four-digit, candle sides uppercase.

use chrono::{DateTime, Datelike, Timelike, Utc};

use humboldt_types::{BookSide, Granularity};

/// Base URL for the Dukascopy data feed.
pub const BASE_URL: &str = "https://datafeed.dukascopy.com/datafeed";

/// Builds the URL for one hour of tick data.
///
/// URL format: `{BASE_URL}/{PREFIX}/{YYYY}/{MM}/{DD}/{HH}h_ticks.bi5`
///
/// # Example
///
/// ```
/// use humboldt_fetch::url::tick_url;
/// use chrono::{TimeZone, Utc};
///
/// let hour = Utc.with_ymd_and_hms(2019, 1, 15, 12, 0, 0).unwrap();
/// let url = tick_url("EURUSD", hour);
/// assert_eq!(url, "https://datafeed.dukascopy.com/datafeed/EURUSD/2019/00/15/12h_ticks.bi5");
/// ```
#[must_use]
pub fn tick_url(remote_prefix: &str, hour: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}/{:02}/{:02}/{:02}h_ticks.bi5",
        BASE_URL,
        remote_prefix,
        hour.year(),
        hour.month() - 1,
        hour.day(),
        hour.hour()
    )
}

/// Builds the URL for one candle file.
///
/// The file shape depends on the fetch granularity:
///
/// | Granularity | Covers | Path shape |
/// |---|---|---|
/// | minute | one UTC day | `{PREFIX}/{YYYY}/{MM}/{DD}/{SIDE}_candles_min_1.bi5` |
/// | hour | one UTC month | `{PREFIX}/{YYYY}/{MM}/{SIDE}_candles_hour_1.bi5` |
/// | day | one UTC year | `{PREFIX}/{YYYY}/{SIDE}_candles_day_1.bi5` |
///
/// `start` is the start of the covering period. Tick granularity has no
/// candle files; it falls through to [`tick_url`].
#[must_use]
pub fn candle_url(
    remote_prefix: &str,
    granularity: Granularity,
    start: DateTime<Utc>,
    side: BookSide,
) -> String {
    match granularity {
        Granularity::Ticks => tick_url(remote_prefix, start),
        Granularity::Minute => format!(
            "{}/{}/{}/{:02}/{:02}/{}_candles_min_1.bi5",
            BASE_URL,
            remote_prefix,
            start.year(),
            start.month() - 1,
            start.day(),
            side.remote_segment()
        ),
        Granularity::Hour => format!(
            "{}/{}/{}/{:02}/{}_candles_hour_1.bi5",
            BASE_URL,
            remote_prefix,
            start.year(),
            start.month() - 1,
            side.remote_segment()
        ),
        Granularity::Day => format!(
            "{}/{}/{}/{}_candles_day_1.bi5",
            BASE_URL,
            remote_prefix,
            start.year(),
            side.remote_segment()
        ),
    }
}
