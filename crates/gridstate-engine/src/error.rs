use gridstate_core::GridError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors from engine construction and settings loading.
///
/// Grid operations never fail; these cover the edges where the host hands
/// the engine configuration or payloads to decode.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] GridError),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
