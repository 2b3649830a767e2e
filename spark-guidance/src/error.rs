//! Error types for spark-guidance

use thiserror::Error;

/// Errors raised at the engine boundary. The guidance computation itself never
/// fails; these only come from constructors and vocabulary loading.
#[derive(Error, Debug)]
pub enum GuidanceError {
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidFrame { width: f32, height: f32 },

    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GuidanceError>;
