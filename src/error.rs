//! Error types for bubble-core.

use thiserror::Error;

/// Result type alias using bubble-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving a chat view.
///
/// None of these are fatal to a running view: arrivals that fail validation
/// are dropped, and the scheduler keeps ticking.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrival payload is missing a required field or carries an unusable value
    #[error("Malformed chat message: {field} {reason}")]
    MalformedMessage { field: &'static str, reason: String },

    /// Measured or supplied geometry violates a bubble invariant
    #[error("Invalid bubble geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The runtime driving the view has shut down
    #[error("Chat runtime is no longer accepting events")]
    ChannelClosed,
}

impl Error {
    /// Create a malformed message error for a missing field.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MalformedMessage {
            field,
            reason: "is missing".to_string(),
        }
    }

    /// Create a malformed message error with a custom reason.
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error came from a bad arrival payload.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedMessage { .. } | Self::InvalidGeometry(_))
    }
}
