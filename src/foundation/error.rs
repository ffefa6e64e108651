/// Convenience result type used across the engine.
pub type CisResult<T> = Result<T, CisError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CisError {
    /// Invalid user-provided or store data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while decoding value buffers into colors.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while depth-merging layers into a final image.
    #[error("composite error: {0}")]
    Composite(String),

    /// Errors when serializing or deserializing attribute data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem errors while reading or writing a store.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CisError {
    /// Build a [`CisError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CisError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CisError::Composite`] value.
    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    /// Build a [`CisError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`CisError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
