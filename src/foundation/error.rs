/// Convenience result type used across scrollreel.
pub type ScrollReelResult<T> = Result<T, ScrollReelError>;

/// Top-level error taxonomy used by player APIs.
///
/// Only construction-time problems (configuration, surface allocation, decoding) surface as
/// errors. Event handlers on [`crate::FramePlayer`] log and absorb failures instead of returning
/// them.
#[derive(thiserror::Error, Debug)]
pub enum ScrollReelError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame resource could not be fetched or decoded.
    #[error("load error: {0}")]
    Load(String),

    /// A drawing surface rejected a request.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollReelError {
    /// Build a [`ScrollReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollReelError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`ScrollReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrollReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
