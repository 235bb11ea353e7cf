//! Error types for TarangIO
//!
//! Frame decoding never fails with an `Error`; it reports a
//! [`DecodeStatus`](crate::devices::mmwave::DecodeStatus) instead. These errors
//! cover the I/O and configuration edges of the crate.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// TarangIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
