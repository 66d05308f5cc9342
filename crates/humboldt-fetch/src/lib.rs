//! Download pipeline for the humboldt Dukascopy data client.
//!
//! This crate turns a validated request into an ordered async stream of
//! market records:
//!
//! - [`url`] - remote `.bi5` path construction
//! - [`plan`] - lazy mapping of the range onto fetch units
//! - [`FetchClient`] - HTTP fetch with retry, backoff and caching
//! - [`decompress_bi5`] - LZMA decompression
//! - [`parse_ticks`] / [`parse_bars`] - binary record decoding
//! - [`stream`] / [`record_stream`] - the batched, ordered record stream

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/humboldt-rs/humboldt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod client;
mod decompress;
mod parse;
pub mod plan;
mod request;
mod stream;
pub mod url;

pub use cache::FileCache;
pub use client::{
    ClientConfig, FetchClient, FetchError, FetchPolicy, HttpResponse, HttpTransport, RetryDelay,
    Transport, TransportError,
};
pub use decompress::{decompress_bi5, DecompressError};
pub use parse::{bar_count, parse_bars, parse_ticks, tick_count, ParseError};
pub use plan::{plan, FetchUnit, Plan};
pub use request::{StreamOptions, StreamRequest, StreamRequestBuilder, DEFAULT_CACHE_DIR};
pub use stream::{record_stream, stream, MidMismatch, StreamError, UnitError};
