//! WellSight Common Library
//!
//! This crate provides the types shared between the WellSight viewer and the
//! simulation-data engines that feed it:
//!
//! - [`item`] - Summary item addressing (`ItemId`, `Qualifier`, classification)
//! - [`source`] - Engine boundary (`SummarySource`, `SourceEngine`, `fetch`)
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod item;
pub mod source;

// Re-export commonly used types at the crate root
pub use config::{
    ChartConfig, LogFormat, LoggingConfig, SourceSpec, ViewerConfig, load_config, parse_config,
};
pub use error::{Error, Result};
pub use item::{ItemId, Qualifier, RawItemHeader, UNKNOWN_WG_NAME};
pub use source::{PlotData, SourceEngine, SummarySource, fetch};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Example
///
/// ```ignore
/// use wellsight_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
