//! Request options, normalization and validation.
//!
//! Two forms exist: [`StreamRequest`] is the fully typed, validated
//! request the orchestrator consumes, built through
//! [`StreamRequestBuilder`]; [`StreamOptions`] is a serde-friendly raw
//! form (strings and plain integers, e.g. from a JSON config) whose
//! [`validate`](StreamOptions::validate) performs the full rule set
//! before any I/O happens.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use humboldt_instruments::InstrumentCatalog;
use humboldt_types::{midnight, DateRange, Granularity, Instrument, Side, ValidationError};

use crate::cache::FileCache;
use crate::client::{FetchPolicy, RetryDelay};

/// Cache directory used when caching is enabled without an explicit dir.
pub const DEFAULT_CACHE_DIR: &str = ".humboldt-cache";

/// A validated stream request.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    /// The resolved instrument.
    pub instrument: Instrument,
    /// Requested data granularity.
    pub granularity: Granularity,
    /// Start of the range (inclusive, UTC).
    pub from: DateTime<Utc>,
    /// End of the range (exclusive, UTC).
    pub to: DateTime<Utc>,
    /// Requested price side (bars only; ticks carry both sides).
    pub side: Side,
    /// Maximum fetch units dispatched concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub batch_pause: Duration,
    /// Retries after the first attempt of each fetch.
    pub max_retries: u32,
    /// Delay policy between retries.
    pub retry_delay: RetryDelay,
    /// Whether an empty 200 body is retried.
    pub retry_on_empty: bool,
    /// Whether retry exhaustion fails the unit instead of yielding a gap.
    pub fail_after_retries: bool,
    /// Cache directory, when caching is enabled.
    pub cache_dir: Option<PathBuf>,
    /// Whether a failed unit terminates the stream.
    pub halt_on_error: bool,
}

impl StreamRequest {
    /// Starts building a request for the given instrument symbol.
    #[must_use]
    pub fn builder(instrument: impl Into<String>) -> StreamRequestBuilder {
        StreamRequestBuilder::new(instrument)
    }

    /// The per-batch concurrency after accounting for mid-price doubling.
    ///
    /// Mid-price bar units issue two fetches each, so the batch is
    /// halved (floor, minimum 1) to keep the in-flight request count
    /// within `batch_size`.
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        if self.side == Side::Mid && !self.granularity.is_ticks() {
            (self.batch_size / 2).max(1)
        } else {
            self.batch_size
        }
    }

    /// Derives the per-fetch policy from the request options.
    #[must_use]
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_retries: self.max_retries,
            retry_delay: self.retry_delay.clone(),
            retry_on_empty: self.retry_on_empty,
            fail_after_retries: self.fail_after_retries,
            cache: self.cache_dir.as_ref().map(FileCache::new),
        }
    }
}

/// Builder for [`StreamRequest`].
#[derive(Debug, Clone)]
pub struct StreamRequestBuilder {
    instrument: String,
    granularity: Granularity,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    dates: Option<DateRange>,
    side: Side,
    batch_size: usize,
    batch_pause: Duration,
    max_retries: u32,
    retry_delay: RetryDelay,
    retry_on_empty: bool,
    fail_after_retries: bool,
    use_cache: bool,
    cache_dir: Option<PathBuf>,
    halt_on_error: bool,
}

impl StreamRequestBuilder {
    fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            granularity: Granularity::default(),
            from: None,
            to: None,
            dates: None,
            side: Side::default(),
            batch_size: 10,
            batch_pause: Duration::ZERO,
            max_retries: 0,
            retry_delay: RetryDelay::default(),
            retry_on_empty: false,
            fail_after_retries: false,
            use_cache: false,
            cache_dir: None,
            halt_on_error: true,
        }
    }

    /// Sets the data granularity.
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Sets the range start (inclusive).
    #[must_use]
    pub const fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the range end (exclusive).
    #[must_use]
    pub const fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Sets an inclusive calendar date range instead of instants.
    #[must_use]
    pub const fn date_range(mut self, dates: DateRange) -> Self {
        self.dates = Some(dates);
        self
    }

    /// Sets the price side.
    #[must_use]
    pub const fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Sets the per-batch concurrency.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the pause between batches.
    #[must_use]
    pub const fn batch_pause(mut self, pause: Duration) -> Self {
        self.batch_pause = pause;
        self
    }

    /// Sets the retry count after the first attempt.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay policy between retries.
    #[must_use]
    pub fn retry_delay(mut self, retry_delay: RetryDelay) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets whether an empty 200 body is retried.
    #[must_use]
    pub const fn retry_on_empty(mut self, retry_on_empty: bool) -> Self {
        self.retry_on_empty = retry_on_empty;
        self
    }

    /// Sets whether retry exhaustion fails the unit.
    #[must_use]
    pub const fn fail_after_retries(mut self, fail_after_retries: bool) -> Self {
        self.fail_after_retries = fail_after_retries;
        self
    }

    /// Enables or disables the file-backed cache.
    #[must_use]
    pub const fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Sets the cache directory (used when caching is enabled).
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Sets whether a failed unit terminates the stream.
    #[must_use]
    pub const fn halt_on_error(mut self, halt_on_error: bool) -> Self {
        self.halt_on_error = halt_on_error;
        self
    }

    /// Validates the options into a [`StreamRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered; see the
    /// variant docs for the rule each represents.
    pub fn build(self) -> Result<StreamRequest, ValidationError> {
        let instrument = InstrumentCatalog::global()
            .get(&self.instrument)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownInstrument(self.instrument.clone()))?;

        let (from, to) = match (self.from, self.to, self.dates) {
            (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => {
                return Err(ValidationError::InvalidDateRange(
                    "both an instant range and a date range were provided".to_string(),
                ))
            }
            (Some(from), Some(to), None) => (from, to),
            (None, None, Some(dates)) => dates.to_utc(),
            _ => return Err(ValidationError::MissingDateRange),
        };

        if self.batch_size == 0 {
            return Err(ValidationError::InvalidPositiveInteger {
                field: "batch_size",
                value: 0,
            });
        }

        let cache_dir = self
            .use_cache
            .then(|| self.cache_dir.unwrap_or_else(|| DEFAULT_CACHE_DIR.into()));

        Ok(StreamRequest {
            instrument,
            granularity: self.granularity,
            from,
            to,
            side: self.side,
            batch_size: self.batch_size,
            batch_pause: self.batch_pause,
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            retry_on_empty: self.retry_on_empty,
            fail_after_retries: self.fail_after_retries,
            cache_dir,
            halt_on_error: self.halt_on_error,
        })
    }
}

/// Raw, serde-friendly request options.
///
/// Every field is optional except the instrument; unset fields take the
/// builder defaults. Dates accept RFC 3339 instants or bare
/// `YYYY-MM-DD` dates (lifted to UTC midnight).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    /// Instrument symbol as users write it (e.g. `"EUR/USD"`).
    pub instrument: String,
    /// Granularity: `ticks`, `m1`, `h1` or `d1`.
    pub granularity: Option<String>,
    /// Range start (inclusive): RFC 3339 or `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Range end (exclusive): RFC 3339 or `YYYY-MM-DD`.
    pub to: Option<String>,
    /// Inclusive calendar date range, mutually exclusive with from/to.
    pub date_range: Option<(String, String)>,
    /// Price side: `bid`, `ask` or `mid`.
    pub side: Option<String>,
    /// Per-batch concurrency (positive).
    pub batch_size: Option<i64>,
    /// Pause between batches in milliseconds (non-negative).
    pub batch_pause_ms: Option<i64>,
    /// Retries after the first attempt (non-negative).
    pub max_retries: Option<i64>,
    /// Fixed delay between retries in milliseconds (non-negative).
    pub retry_delay_ms: Option<i64>,
    /// Whether an empty 200 body is retried.
    pub retry_on_empty: Option<bool>,
    /// Whether retry exhaustion fails the unit.
    pub fail_after_retries: Option<bool>,
    /// Whether the file-backed cache is used.
    pub use_cache: Option<bool>,
    /// Cache directory.
    pub cache_dir: Option<String>,
    /// Whether a failed unit terminates the stream.
    pub halt_on_error: Option<bool>,
}

impl StreamOptions {
    /// Parses and validates the raw options into a [`StreamRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(self) -> Result<StreamRequest, ValidationError> {
        let mut builder = StreamRequest::builder(self.instrument);

        if let Some(granularity) = self.granularity {
            builder = builder.granularity(granularity.parse()?);
        }
        if let Some(side) = self.side {
            builder = builder.side(side.parse()?);
        }
        if let Some(from) = self.from {
            builder = builder.from(parse_instant(&from)?);
        }
        if let Some(to) = self.to {
            builder = builder.to(parse_instant(&to)?);
        }
        if let Some((first, last)) = self.date_range {
            builder = builder.date_range(DateRange::new(
                parse_date(&first)?,
                parse_date(&last)?,
            )?);
        }
        if let Some(batch_size) = self.batch_size {
            builder = builder.batch_size(positive(batch_size, "batch_size")?);
        }
        if let Some(pause) = self.batch_pause_ms {
            builder =
                builder.batch_pause(Duration::from_millis(non_negative(pause, "batch_pause_ms")?));
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(non_negative(retries, "max_retries")? as u32);
        }
        if let Some(delay) = self.retry_delay_ms {
            if delay < 0 {
                return Err(ValidationError::InvalidRetryDelay(delay));
            }
            builder = builder.retry_delay(RetryDelay::Fixed(delay as u64));
        }
        if let Some(retry_on_empty) = self.retry_on_empty {
            builder = builder.retry_on_empty(retry_on_empty);
        }
        if let Some(fail_after_retries) = self.fail_after_retries {
            builder = builder.fail_after_retries(fail_after_retries);
        }
        if let Some(use_cache) = self.use_cache {
            builder = builder.use_cache(use_cache);
        }
        if let Some(cache_dir) = self.cache_dir {
            builder = builder.cache_dir(cache_dir);
        }
        if let Some(halt_on_error) = self.halt_on_error {
            builder = builder.halt_on_error(halt_on_error);
        }

        builder.build()
    }
}

/// Parses an RFC 3339 instant or a bare date lifted to UTC midnight.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    parse_date(s).map(midnight)
}

fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDateRange(format!("unparseable date '{s}'")))
}

fn positive(value: i64, field: &'static str) -> Result<usize, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::InvalidPositiveInteger { field, value });
    }
    Ok(value as usize)
}

fn non_negative(value: i64, field: &'static str) -> Result<u64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::InvalidNonNegativeInteger { field, value });
    }
    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_options() -> StreamOptions {
        StreamOptions {
            instrument: "EUR/USD".to_string(),
            granularity: Some("m1".to_string()),
            from: Some("2019-02-04".to_string()),
            to: Some("2019-02-05".to_string()),
            ..StreamOptions::default()
        }
    }

    #[test]
    fn test_validate_happy_path() {
        let request = base_options().validate().unwrap();

        assert_eq!(request.instrument.remote_prefix(), "EURUSD");
        assert_eq!(request.granularity, Granularity::Minute);
        assert_eq!(request.from, Utc.with_ymd_and_hms(2019, 2, 4, 0, 0, 0).unwrap());
        assert_eq!(request.to, Utc.with_ymd_and_hms(2019, 2, 5, 0, 0, 0).unwrap());
        assert_eq!(request.side, Side::Bid);
        assert_eq!(request.batch_size, 10);
        assert!(request.halt_on_error);
        assert!(request.cache_dir.is_none());
    }

    #[test]
    fn test_unknown_instrument() {
        let options = StreamOptions {
            instrument: "XYZ/ABC".to_string(),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::UnknownInstrument(_))
        ));
    }

    #[test]
    fn test_invalid_granularity() {
        let options = StreamOptions {
            granularity: Some("weekly".to_string()),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidGranularity(_))
        ));
    }

    #[test]
    fn test_invalid_side() {
        let options = StreamOptions {
            side: Some("last".to_string()),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidPriceType(_))
        ));
    }

    #[test]
    fn test_missing_range() {
        let options = StreamOptions {
            from: None,
            to: None,
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::MissingDateRange)
        ));
    }

    #[test]
    fn test_partial_instant_range() {
        let options = StreamOptions {
            to: None,
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::MissingDateRange)
        ));
    }

    #[test]
    fn test_both_range_forms_rejected() {
        let options = StreamOptions {
            date_range: Some(("2019-02-04".to_string(), "2019-02-05".to_string())),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_date_range_lifts_to_half_open() {
        let options = StreamOptions {
            from: None,
            to: None,
            date_range: Some(("2019-02-04".to_string(), "2019-02-05".to_string())),
            ..base_options()
        };
        let request = options.validate().unwrap();

        assert_eq!(request.from, Utc.with_ymd_and_hms(2019, 2, 4, 0, 0, 0).unwrap());
        // inclusive last day lifts to exclusive next midnight
        assert_eq!(request.to, Utc.with_ymd_and_hms(2019, 2, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_inverted_date_range() {
        let options = StreamOptions {
            from: None,
            to: None,
            date_range: Some(("2019-02-05".to_string(), "2019-02-04".to_string())),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_unparseable_date() {
        let options = StreamOptions {
            from: Some("02/04/2019".to_string()),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_rfc3339_instant_accepted() {
        let options = StreamOptions {
            from: Some("2019-02-04T10:30:00Z".to_string()),
            ..base_options()
        };
        let request = options.validate().unwrap();
        assert_eq!(
            request.from,
            Utc.with_ymd_and_hms(2019, 2, 4, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_zero_batch_size() {
        let options = StreamOptions {
            batch_size: Some(0),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidPositiveInteger {
                field: "batch_size",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_max_retries() {
        let options = StreamOptions {
            max_retries: Some(-1),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidNonNegativeInteger {
                field: "max_retries",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_retry_delay() {
        let options = StreamOptions {
            retry_delay_ms: Some(-200),
            ..base_options()
        };
        assert!(matches!(
            options.validate(),
            Err(ValidationError::InvalidRetryDelay(-200))
        ));
    }

    #[test]
    fn test_use_cache_defaults_directory() {
        let options = StreamOptions {
            use_cache: Some(true),
            ..base_options()
        };
        let request = options.validate().unwrap();
        assert_eq!(request.cache_dir, Some(PathBuf::from(DEFAULT_CACHE_DIR)));
    }

    #[test]
    fn test_effective_batch_size_halved_for_mid_bars() {
        let request = StreamRequest::builder("EUR/USD")
            .granularity(Granularity::Minute)
            .side(Side::Mid)
            .from(Utc.with_ymd_and_hms(2019, 2, 4, 0, 0, 0).unwrap())
            .to(Utc.with_ymd_and_hms(2019, 2, 5, 0, 0, 0).unwrap())
            .batch_size(10)
            .build()
            .unwrap();
        assert_eq!(request.effective_batch_size(), 5);

        let request = StreamRequest::builder("EUR/USD")
            .granularity(Granularity::Minute)
            .side(Side::Mid)
            .from(Utc.with_ymd_and_hms(2019, 2, 4, 0, 0, 0).unwrap())
            .to(Utc.with_ymd_and_hms(2019, 2, 5, 0, 0, 0).unwrap())
            .batch_size(1)
            .build()
            .unwrap();
        assert_eq!(request.effective_batch_size(), 1);
    }

    #[test]
    fn test_effective_batch_size_unchanged_for_ticks() {
        let request = StreamRequest::builder("EUR/USD")
            .granularity(Granularity::Ticks)
            .side(Side::Mid)
            .from(Utc.with_ymd_and_hms(2019, 2, 4, 0, 0, 0).unwrap())
            .to(Utc.with_ymd_and_hms(2019, 2, 4, 5, 0, 0).unwrap())
            .batch_size(10)
            .build()
            .unwrap();
        assert_eq!(request.effective_batch_size(), 10);
    }

    #[test]
    fn test_options_deserialize_from_json() {
        let options: StreamOptions = serde_json::from_str(
            r#"{
                "instrument": "GBP/USD",
                "granularity": "ticks",
                "from": "2019-02-04",
                "to": "2019-02-05",
                "max_retries": 3,
                "use_cache": true
            }"#,
        )
        .unwrap();
        let request = options.validate().unwrap();

        assert_eq!(request.instrument.remote_prefix(), "GBPUSD");
        assert_eq!(request.granularity, Granularity::Ticks);
        assert_eq!(request.max_retries, 3);
    }
}
