use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Chart interaction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Minimum time between two accepted slot deletions, in milliseconds.
    #[serde(default = "default_delete_debounce_ms")]
    pub delete_debounce_ms: i64,
}

fn default_delete_debounce_ms() -> i64 {
    100
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            delete_debounce_ms: default_delete_debounce_ms(),
        }
    }
}

/// A source to open at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    /// File-based source.
    Path { path: PathBuf },
    /// Network stream.
    Network { host: String, port: u16 },
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Sources opened at startup, in order.
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

impl ViewerConfig {
    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<()> {
        if self.chart.delete_debounce_ms < 0 {
            return Err(Error::Config(format!(
                "chart.delete_debounce_ms must not be negative (got {})",
                self.chart.delete_debounce_ms
            )));
        }

        for spec in &self.sources {
            if let SourceSpec::Network { host, port } = spec
                && (host.is_empty() || *port == 0)
            {
                return Err(Error::Config(format!(
                    "Invalid network source '{}:{}'",
                    host, port
                )));
            }
        }

        Ok(())
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
