//! Streaming Rust client for Dukascopy historical market data.
//!
//! This is a facade crate that re-exports functionality from the
//! humboldt workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use futures::StreamExt;
//! use humboldt_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FetchClient::with_defaults()?;
//!     let options = StreamOptions {
//!         instrument: "EUR/USD".into(),
//!         granularity: Some("ticks".into()),
//!         from: Some("2019-02-04".into()),
//!         to: Some("2019-02-05".into()),
//!         ..StreamOptions::default()
//!     };
//!
//!     let mut records = stream(&client, options)?;
//!     while let Some(record) = records.next().await {
//!         println!("{:?}", record?);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/humboldt-rs/humboldt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use humboldt_types::*;

// Re-export the instrument catalog
pub use humboldt_instruments::InstrumentCatalog;

// Re-export the download pipeline
pub use humboldt_fetch::{
    bar_count, decompress_bi5, parse_bars, parse_ticks, plan, record_stream, stream, tick_count,
    ClientConfig, DecompressError, FetchClient, FetchError, FetchPolicy, FetchUnit, FileCache,
    HttpResponse, HttpTransport, MidMismatch, ParseError, Plan, RetryDelay, StreamError,
    StreamOptions, StreamRequest, StreamRequestBuilder, Transport, TransportError, UnitError,
};

/// Prelude module for convenient imports.
///
/// ```
/// use humboldt_lib::prelude::*;
/// ```
pub mod prelude {
    pub use humboldt_types::{
        Bar, BookSide, DateRange, Granularity, Instrument, RawBar, RawTick, Record, Side, Tick,
        ValidationError,
    };

    pub use humboldt_instruments::InstrumentCatalog;

    pub use humboldt_fetch::{
        record_stream, stream, ClientConfig, FetchClient, FetchError, RetryDelay, StreamError,
        StreamOptions, StreamRequest,
    };
}
