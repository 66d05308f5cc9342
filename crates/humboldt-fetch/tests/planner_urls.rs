//! Which URLs a request actually fetches: file-count expectations and
//! the current-period fallback, observed end-to-end through a stub
//! transport that records every request.

mod helpers;

use chrono::{Datelike, TimeZone, Utc};
use futures::StreamExt;

use helpers::{status, StubTransport};
use humboldt_fetch::{record_stream, FetchClient, StreamRequest};
use humboldt_types::{midnight, Granularity, Record};

async fn fetched_urls(granularity: Granularity, from: (i32, u32, u32), to: (i32, u32, u32)) -> Vec<String> {
    let stub = StubTransport::new(|_, _| status(404));
    let client = FetchClient::with_transport(stub.clone());

    let req = StreamRequest::builder("EUR/USD")
        .granularity(granularity)
        .from(Utc.with_ymd_and_hms(from.0, from.1, from.2, 0, 0, 0).unwrap())
        .to(Utc.with_ymd_and_hms(to.0, to.1, to.2, 0, 0, 0).unwrap())
        .build()
        .unwrap();

    let records: Vec<Record> = record_stream(client, req)
        .map(Result::unwrap)
        .collect()
        .await;
    // 404 everywhere: gaps, not errors
    assert!(records.is_empty());

    stub.requests()
}

#[tokio::test]
async fn test_minute_day_fetches_one_daily_file() {
    let urls = fetched_urls(Granularity::Minute, (2019, 1, 4), (2019, 1, 5)).await;

    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("2019/00/04"));
    assert!(urls[0].contains("BID_candles_min_1.bi5"));
}

#[tokio::test]
async fn test_hour_month_fetches_one_monthly_file() {
    let urls = fetched_urls(Granularity::Hour, (2019, 1, 1), (2019, 1, 31)).await;

    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("2019/00"));
    assert!(urls[0].contains("BID_candles_hour_1.bi5"));
}

#[tokio::test]
async fn test_day_year_fetches_one_yearly_file() {
    let urls = fetched_urls(Granularity::Day, (2019, 1, 1), (2019, 12, 31)).await;

    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("/2019/"));
    assert!(urls[0].contains("BID_candles_day_1.bi5"));
}

#[tokio::test]
async fn test_fully_past_day_request_stays_on_yearly_files() {
    let urls = fetched_urls(Granularity::Day, (2019, 1, 1), (2019, 6, 30)).await;

    assert!(!urls.is_empty());
    assert!(urls.iter().all(|u| u.contains("candles_day_1")));
}

#[tokio::test]
async fn test_current_year_day_request_never_fetches_yearly_file() {
    // [Jan 1 of the current year, today): the year file cannot exist
    // yet, so only finer-grained files may be fetched. (Empty on Jan 1.)
    let today = Utc::now().date_naive();
    let stub = StubTransport::new(|_, _| status(404));
    let client = FetchClient::with_transport(stub.clone());

    let req = StreamRequest::builder("EUR/USD")
        .granularity(Granularity::Day)
        .from(Utc.with_ymd_and_hms(today.year(), 1, 1, 0, 0, 0).unwrap())
        .to(midnight(today))
        .build()
        .unwrap();

    let _: Vec<_> = record_stream(client, req).collect().await;
    let urls = stub.requests();

    assert!(urls.iter().all(|u| !u.contains("candles_day_1")));
    assert!(urls
        .iter()
        .all(|u| u.contains("candles_hour_1") || u.contains("candles_min_1")));
}

#[tokio::test]
async fn test_empty_range_makes_no_requests() {
    let stub = StubTransport::new(|_, _| status(404));
    let client = FetchClient::with_transport(stub.clone());

    let at = Utc.with_ymd_and_hms(2019, 2, 4, 0, 0, 0).unwrap();
    let req = StreamRequest::builder("EUR/USD")
        .granularity(Granularity::Ticks)
        .from(at)
        .to(at)
        .build()
        .unwrap();

    let items: Vec<_> = record_stream(client, req).collect().await;
    assert!(items.is_empty());
    assert_eq!(stub.request_count(), 0);
}
