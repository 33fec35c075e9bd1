//! Infrastructure configuration modules.

pub mod arbitrage;
pub mod logging;
pub mod reconnection;
pub mod settings;
pub mod source;

pub use arbitrage::{ArbitrageConfig, ModeConfig};
pub use logging::LoggingConfig;
pub use reconnection::ReconnectionConfig;
pub use settings::{Config, EnabledSource};
pub use source::{SourceConfig, SourceKind};
