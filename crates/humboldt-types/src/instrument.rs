//! Financial instrument metadata.

use serde::Serialize;

/// Metadata for a tradable instrument known to the remote.
///
/// The point value is the divisor converting raw integer wire prices to
/// decimals. By default it is `10 / pip_value`; the catalog overrides it
/// for a handful of symbols where the remote deviates from that formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instrument {
    name: String,
    remote_prefix: String,
    pip_value: f64,
    point_value: f64,
}

impl Instrument {
    /// Creates a new instrument with the default point value derived
    /// from its pip value.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        remote_prefix: impl Into<String>,
        pip_value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            remote_prefix: remote_prefix.into(),
            pip_value,
            point_value: 10.0 / pip_value,
        }
    }

    /// Replaces the derived point value with an explicit one.
    #[must_use]
    pub const fn with_point_value(mut self, point_value: f64) -> Self {
        self.point_value = point_value;
        self
    }

    /// Returns the instrument symbol as users write it (e.g. `"EUR/USD"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path prefix identifying the instrument on the remote.
    #[must_use]
    pub fn remote_prefix(&self) -> &str {
        &self.remote_prefix
    }

    /// Returns the pip value.
    #[must_use]
    pub const fn pip_value(&self) -> f64 {
        self.pip_value
    }

    /// Returns the divisor converting raw wire prices to decimals.
    #[must_use]
    pub const fn point_value(&self) -> f64 {
        self.point_value
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.remote_prefix)
    }
}
