//! Core types for the humboldt Dukascopy data client.
//!
//! This crate provides the fundamental data structures used throughout
//! humboldt:
//!
//! - [`Tick`] / [`RawTick`] - a quote update and its 20-byte wire form
//! - [`Bar`] / [`RawBar`] - an OHLCV bar and its 24-byte wire form
//! - [`Record`] - the unified stream item (tick or bar)
//! - [`Granularity`] - requested and per-file data granularity
//! - [`Side`] / [`BookSide`] - requested price side and its remote form
//! - [`Instrument`] - instrument metadata with point values
//! - [`DateRange`] - inclusive calendar ranges lifting to UTC instants

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/humboldt-rs/humboldt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod date_range;
mod error;
mod granularity;
mod instrument;
mod record;
mod side;
mod tick;

pub use bar::{Bar, RawBar};
pub use date_range::{midnight, DateRange};
pub use error::ValidationError;
pub use granularity::Granularity;
pub use instrument::Instrument;
pub use record::Record;
pub use side::{BookSide, Side};
pub use tick::{RawTick, Tick};
