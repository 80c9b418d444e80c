/// Convenience result type used across Cubist.
pub type CubistResult<T> = Result<T, CubistError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum CubistError {
    /// Invalid configuration or registry data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while capturing or decoding section snapshots.
    #[error("capture error: {0}")]
    Capture(String),

    /// Errors while mounting or rendering the cube scene.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CubistError {
    /// Build a [`CubistError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CubistError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`CubistError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
