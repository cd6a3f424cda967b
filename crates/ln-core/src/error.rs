use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("invalid stride")]
    InvalidStride,
    #[error("empty image: {width}x{height}")]
    EmptyImage { width: usize, height: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Fails with [`Error::EmptyImage`] unless both dimensions are at least 1.
    pub fn ensure_non_empty(width: usize, height: usize) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        Ok(())
    }
}
