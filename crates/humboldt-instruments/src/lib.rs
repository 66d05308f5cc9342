//! Instrument catalog for the humboldt Dukascopy data client.
//!
//! Provides the lookup table from user-facing trading symbols to remote
//! path prefixes and point values.
//!
//! # Example
//!
//! ```
//! use humboldt_instruments::InstrumentCatalog;
//!
//! let catalog = InstrumentCatalog::global();
//!
//! if let Some(instrument) = catalog.get("EUR/USD") {
//!     println!("{}: {}", instrument.name(), instrument.point_value());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/humboldt-rs/humboldt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use humboldt_types::Instrument;

/// The instrument metadata JSON embedded at compile time.
const CATALOG_JSON: &str = include_str!("../data/instruments.json");

/// Symbols whose point value deviates from the `10 / pip_value` formula.
///
/// Kept local to this crate so new overrides never require changes
/// elsewhere.
const POINT_VALUE_OVERRIDES: &[(&str, f64)] = &[
    ("BAT/USD", 100_000.0),
    ("UNI/USD", 1_000.0),
    ("LNK/USD", 1_000.0),
];

/// Global catalog instance.
static CATALOG: OnceLock<InstrumentCatalog> = OnceLock::new();

/// One entry of the embedded catalog JSON.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    remote_prefix: String,
    pip_value: f64,
}

/// Catalog of all instruments known to the remote.
#[derive(Debug)]
pub struct InstrumentCatalog {
    instruments: HashMap<String, Instrument>,
}

impl InstrumentCatalog {
    /// Returns the global catalog, initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        CATALOG.get_or_init(Self::load)
    }

    /// Loads instruments from the embedded JSON data and applies the
    /// point-value overrides.
    fn load() -> Self {
        let entries: HashMap<String, CatalogEntry> =
            serde_json::from_str(CATALOG_JSON).expect("invalid instruments.json");

        let instruments = entries
            .into_iter()
            .map(|(name, entry)| {
                let mut instrument =
                    Instrument::new(name.clone(), entry.remote_prefix, entry.pip_value);
                if let Some((_, point_value)) = POINT_VALUE_OVERRIDES
                    .iter()
                    .find(|(symbol, _)| *symbol == name)
                {
                    instrument = instrument.with_point_value(*point_value);
                }
                (name, instrument)
            })
            .collect();

        Self { instruments }
    }

    /// Looks up an instrument by its trading symbol.
    ///
    /// The lookup is exact first, then falls back to a case-insensitive
    /// scan so `"eur/usd"` resolves too.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Instrument> {
        self.instruments.get(name).or_else(|| {
            self.instruments
                .iter()
                .find(|(symbol, _)| symbol.eq_ignore_ascii_case(name))
                .map(|(_, instrument)| instrument)
        })
    }

    /// Returns all instruments as an iterator.
    pub fn all(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    /// Returns the total number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Searches instruments by symbol substring (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&Instrument> {
        let pattern = pattern.to_lowercase();
        self.instruments
            .values()
            .filter(|i| i.name().to_lowercase().contains(&pattern))
            .collect()
    }

    /// Returns all symbols sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.instruments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
