use crate::foundation::core::Canvas;

/// Convenience result type used across layercam.
pub type LayercamResult<T> = Result<T, LayercamError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum LayercamError {
    /// A filter spec names a type that is not registered.
    #[error("unknown filter type: {0}")]
    UnknownFilterType(String),

    /// A filter parameter has the wrong type or an unusable value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A layer produced a frame whose dimensions differ from the composition.
    #[error("frame shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Dimensions of the composition.
        expected: Canvas,
        /// Dimensions of the offending frame.
        actual: Canvas,
    },

    /// Malformed configuration document or invalid edit.
    #[error("configuration error: {0}")]
    Config(String),

    /// Capture or output device failure, surfaced unchanged.
    #[error("device error: {0}")]
    Device(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayercamError {
    /// Build a [`LayercamError::UnknownFilterType`] value.
    pub fn unknown_filter(name: impl Into<String>) -> Self {
        Self::UnknownFilterType(name.into())
    }

    /// Build a [`LayercamError::InvalidParameter`] value.
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`LayercamError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LayercamError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`LayercamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors caused by mismatched frame dimensions.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
