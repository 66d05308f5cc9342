//! Ordered streaming composition of planned fetch units.
//!
//! The orchestrator consumes the lazy plan in batches, dispatches each
//! batch's fetch+decode pipelines concurrently, and emits records in
//! planned order regardless of completion order, so the output stays
//! globally chronological. The stream is pull-driven: dropping it stops
//! batch dispatch and cancels in-flight requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use thiserror::Error;

use humboldt_types::{Bar, BookSide, Granularity, Record, Side, ValidationError};

use crate::client::{FetchClient, FetchError, FetchPolicy};
use crate::parse::{self, ParseError};
use crate::plan::{self, FetchUnit};
use crate::request::{StreamOptions, StreamRequest};
use crate::url;

/// Disagreement between the two book sides of a mid-price unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MidMismatch {
    /// The sides decoded different record counts.
    #[error("bid and ask sides disagree on record count: {bid} vs {ask}")]
    Count {
        /// Bid-side record count.
        bid: usize,
        /// Ask-side record count.
        ask: usize,
    },

    /// The sides disagree on a record timestamp.
    #[error("bid and ask sides disagree on timestamps: {bid} vs {ask}")]
    Timestamp {
        /// Bid-side timestamp.
        bid: DateTime<Utc>,
        /// Ask-side timestamp.
        ask: DateTime<Utc>,
    },
}

/// A per-unit pipeline failure.
#[derive(Error, Debug)]
pub enum UnitError {
    /// The fetch failed terminally.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The decompressed blob did not decode.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The two sides of a mid-price unit disagree.
    #[error(transparent)]
    MidMismatch(#[from] MidMismatch),
}

/// A pipeline failure annotated with the unit it arose from.
///
/// With `halt_on_error` set this terminates the stream; otherwise it is
/// logged and the unit contributes zero records.
#[derive(Error, Debug)]
#[error("fetch unit {unit} failed: {source}")]
pub struct StreamError {
    /// The planned unit that failed.
    pub unit: FetchUnit,
    /// The underlying failure.
    pub source: UnitError,
}

/// Validates raw options and opens the record stream.
///
/// This is the primary entry point. The returned stream is single-pass,
/// finite for any finite range, and may be dropped early to cancel
/// outstanding work.
///
/// # Errors
///
/// Returns a [`ValidationError`] before any I/O if the options are
/// malformed.
pub fn stream(
    client: &FetchClient,
    options: StreamOptions,
) -> Result<impl Stream<Item = Result<Record, StreamError>>, ValidationError> {
    let request = options.validate()?;
    Ok(record_stream(client.clone(), request))
}

/// Opens the record stream for an already validated request.
pub fn record_stream(
    client: FetchClient,
    request: StreamRequest,
) -> impl Stream<Item = Result<Record, StreamError>> {
    let from = request.from;
    let to = request.to;
    let halt_on_error = request.halt_on_error;
    let pause = request.batch_pause;

    let ctx = Arc::new(UnitContext {
        policy: request.fetch_policy(),
        prefix: request.instrument.remote_prefix().to_string(),
        point_value: request.instrument.point_value(),
        side: request.side,
        client,
    });

    let units = plan::plan(request.granularity, from, to, Utc::now());
    let batches = Batches::new(units, request.effective_batch_size());

    stream::iter(batches.enumerate())
        .then(move |(index, batch)| {
            let ctx = Arc::clone(&ctx);
            async move {
                if index > 0 && !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
                // join_all keeps planned order while the batch runs
                // concurrently
                future::join_all(batch.into_iter().map(|unit| run_unit(Arc::clone(&ctx), unit)))
                    .await
            }
        })
        .flat_map(stream::iter)
        .scan(false, move |halted, result| {
            if *halted {
                return future::ready(None);
            }
            let items: Vec<Result<Record, StreamError>> = match result {
                Ok(records) => records
                    .into_iter()
                    .filter(|record| {
                        let t = record.timestamp();
                        t >= from && t < to
                    })
                    .map(Ok)
                    .collect(),
                Err(error) if halt_on_error => {
                    *halted = true;
                    vec![Err(error)]
                }
                Err(error) => {
                    tracing::error!(
                        unit = %error.unit,
                        error = %error.source,
                        "skipping failed fetch unit"
                    );
                    Vec::new()
                }
            };
            future::ready(Some(stream::iter(items)))
        })
        .flatten()
}

/// Everything a unit task needs, shared across the whole stream.
struct UnitContext {
    client: FetchClient,
    policy: FetchPolicy,
    prefix: String,
    point_value: f64,
    side: Side,
}

/// Runs one unit's fetch+decode pipeline.
async fn run_unit(ctx: Arc<UnitContext>, unit: FetchUnit) -> Result<Vec<Record>, StreamError> {
    let result = match (unit.granularity(), ctx.side) {
        (Granularity::Ticks, _) => fetch_ticks(&ctx, unit).await,
        (_, Side::Mid) => fetch_mid_bars(&ctx, unit).await,
        (_, Side::Bid) => fetch_bars(&ctx, unit, BookSide::Bid).await,
        (_, Side::Ask) => fetch_bars(&ctx, unit, BookSide::Ask).await,
    };
    result.map_err(|source| StreamError { unit, source })
}

async fn fetch_ticks(ctx: &UnitContext, unit: FetchUnit) -> Result<Vec<Record>, UnitError> {
    let url = url::tick_url(&ctx.prefix, unit.start());
    let bytes = ctx.client.fetch(&url, &ctx.policy).await?;
    let records = parse::parse_ticks(&bytes)?
        .map(|raw| Record::Tick(raw.normalize(unit.start(), ctx.point_value)))
        .collect();
    Ok(records)
}

async fn fetch_bars(
    ctx: &UnitContext,
    unit: FetchUnit,
    side: BookSide,
) -> Result<Vec<Record>, UnitError> {
    let bars = fetch_side_bars(ctx, unit, side).await?;
    Ok(bars.into_iter().map(Record::Bar).collect())
}

/// Mid-price mode: fetch both book sides of the same unit and average
/// them componentwise (volumes are summed).
async fn fetch_mid_bars(ctx: &UnitContext, unit: FetchUnit) -> Result<Vec<Record>, UnitError> {
    let (bid, ask) = future::try_join(
        fetch_side_bars(ctx, unit, BookSide::Bid),
        fetch_side_bars(ctx, unit, BookSide::Ask),
    )
    .await?;
    let bars = merge_mid(bid, ask)?;
    Ok(bars.into_iter().map(Record::Bar).collect())
}

async fn fetch_side_bars(
    ctx: &UnitContext,
    unit: FetchUnit,
    side: BookSide,
) -> Result<Vec<Bar>, UnitError> {
    let url = url::candle_url(&ctx.prefix, unit.granularity(), unit.start(), side);
    let bytes = ctx.client.fetch(&url, &ctx.policy).await?;
    let bars = parse::parse_bars(&bytes)?
        .map(|raw| raw.normalize(unit.start(), ctx.point_value))
        .collect();
    Ok(bars)
}

/// Zips the two sides of a mid-price unit by timestamp.
fn merge_mid(bid: Vec<Bar>, ask: Vec<Bar>) -> Result<Vec<Bar>, MidMismatch> {
    if bid.len() != ask.len() {
        return Err(MidMismatch::Count {
            bid: bid.len(),
            ask: ask.len(),
        });
    }
    bid.into_iter()
        .zip(ask)
        .map(|(b, a)| {
            if b.timestamp != a.timestamp {
                return Err(MidMismatch::Timestamp {
                    bid: b.timestamp,
                    ask: a.timestamp,
                });
            }
            Ok(Bar::new(
                b.timestamp,
                (b.open + a.open) / 2.0,
                (b.high + a.high) / 2.0,
                (b.low + a.low) / 2.0,
                (b.close + a.close) / 2.0,
                b.volume + a.volume,
            ))
        })
        .collect()
}

/// Chunks an iterator into vectors of at most `size` items.
struct Batches<I> {
    inner: I,
    size: usize,
}

impl<I> Batches<I> {
    const fn new(inner: I, size: usize) -> Self {
        Self { inner, size }
    }
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<_> = self.inner.by_ref().take(self.size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}
