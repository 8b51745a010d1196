use thiserror::Error;

/// Errors surfaced by the galaxy map engine.
///
/// Only config errors reach the caller of `GalaxyMap::from_json`. Storage
/// errors are logged and the map carries on with defaults.
#[derive(Debug, Error)]
pub enum MapError {
    /// A configuration value is outside its usable range.
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// Configuration JSON could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The durable position store rejected a read or write.
    #[error("position storage failed: {0}")]
    Storage(String),
}

/// Convenience alias: a `Result` using `MapError` as the error type.
pub type MapResult<T> = Result<T, MapError>;
