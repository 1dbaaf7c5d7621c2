use thiserror::Error;

/// Common error type for WellSight components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A raw engine header that maps to no known qualifier.
    #[error("Unsupported summary item. KEYWORD: {keyword}, WGNAME: {wg_name}, NUM: {num}")]
    UnsupportedItem {
        keyword: String,
        wg_name: String,
        num: i32,
    },

    /// An append was refused; the axis is left untouched.
    #[error("Cannot add item to {axis} axis: {reason}")]
    AxisAssignRejected { axis: String, reason: String },

    /// A catalog position used after the source list changed.
    #[error("Catalog position {position} (generation {generation}) is stale")]
    StaleCatalogIndex { position: usize, generation: u64 },

    #[error("Source position {position} out of range ({count} sources loaded)")]
    SourceOutOfRange { position: usize, count: usize },

    #[error("Source error: {0}")]
    Source(String),
}

impl Error {
    /// Create an engine/source error.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create an assignment rejection.
    pub fn rejected(axis: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::AxisAssignRejected {
            axis: axis.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using WellSight's Error.
pub type Result<T> = std::result::Result<T, Error>;
