/// Convenience result type used across qrstamp.
pub type QrStampResult<T> = Result<T, QrStampError>;

/// Top-level error taxonomy used by overlay APIs.
///
/// Every variant is recoverable at frame granularity: a failed call leaves no state behind
/// that would affect the next frame.
#[derive(thiserror::Error, Debug)]
pub enum QrStampError {
    /// Malformed frame descriptors or out-of-range settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// The symbol cannot be placed in the frame, even fully shrunk.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The symbol encoder rejected the payload or its parameters.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QrStampError {
    /// Build a [`QrStampError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrStampError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`QrStampError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`QrStampError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
