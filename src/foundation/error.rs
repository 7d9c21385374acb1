pub type BoothResult<T> = Result<T, BoothError>;

/// Crate-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    /// Invalid input data (template, config, sticker payload).
    #[error("validation error: {0}")]
    Validation(String),

    /// The camera source produced no usable still.
    #[error("capture error: {0}")]
    Capture(String),

    /// The canvas surface failed to rasterize a scene.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding or saving the exported raster failed.
    #[error("export error: {0}")]
    Export(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level failure (IO, image codecs).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    /// Build a [`BoothError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoothError::Capture`].
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`BoothError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BoothError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`BoothError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
