use std::path::{Path, PathBuf};

/// Convenience result type used across alphablend.
pub type BlendResult<T> = Result<T, BlendError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// A source image path did not decode to any pixels.
    #[error("file not found: '{}': {reason}", path.display())]
    FileNotFound {
        /// Path handed to the decoder.
        path: PathBuf,
        /// Decoder or IO failure description.
        reason: String,
    },

    /// The underlying memory allocation failed.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// An allocation succeeded but violates the requested alignment, or the alignment is invalid.
    #[error("alignment error: {0}")]
    Alignment(String),

    /// A placement would write outside its destination buffer.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A byte copy into a buffer of declared size could not be performed.
    #[error("copy error: {0}")]
    Copy(String),

    /// Invalid configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build a [`BlendError::FileNotFound`] value.
    pub fn file_not_found(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::FileNotFound {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Build a [`BlendError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`BlendError::Alignment`] value.
    pub fn alignment(msg: impl Into<String>) -> Self {
        Self::Alignment(msg.into())
    }

    /// Build a [`BlendError::OutOfBounds`] value.
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    /// Build a [`BlendError::Copy`] value.
    pub fn copy(msg: impl Into<String>) -> Self {
        Self::Copy(msg.into())
    }

    /// Build a [`BlendError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
