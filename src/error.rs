use thiserror::Error;

/// Failures raised by a render surface or the terminal behind it.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface was asked for something its backend never provided.
    #[error("render surface does not implement `{capability}`")]
    NotImplemented { capability: &'static str },

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SurfaceError {
    pub fn not_implemented(capability: &'static str) -> Self {
        SurfaceError::NotImplemented { capability }
    }

    /// Wraps whatever crossterm reports; its error type changes between releases.
    pub fn terminal(err: impl std::fmt::Display) -> Self {
        SurfaceError::Terminal(err.to_string())
    }
}
