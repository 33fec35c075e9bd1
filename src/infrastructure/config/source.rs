//! Price source configuration (`[sources.<name>]`).

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Transport adapters the binary knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Kraken,
    Binance,
}

impl SourceKind {
    /// Resolve an adapter kind from its name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSource`] for unsupported names.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "kraken" => Ok(Self::Kraken),
            "binance" => Ok(Self::Binance),
            _ => Err(ConfigError::UnknownSource(name.to_string())),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kraken => "kraken",
            Self::Binance => "binance",
        }
    }
}

/// One price source.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Taker fee as a percentage, e.g. `0.26` for 0.26%.
    pub taker_fee_pct: Decimal,
    /// Adapter to use. Defaults to the section name.
    #[serde(default)]
    pub kind: Option<String>,
    /// WebSocket URL override.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    /// Adapter kind for a source configured under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSource`] if neither `kind` nor `name`
    /// names a supported adapter.
    pub fn kind_for(&self, name: &str) -> Result<SourceKind, ConfigError> {
        SourceKind::parse(self.kind.as_deref().unwrap_or(name))
    }
}
