use thiserror::Error;

/// Errors raised when an operation is handed input outside its documented domain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("`{name}` must be positive, got {value}")]
    InvalidCount { name: &'static str, value: usize },

    #[error("grid cell ({row}, {col}) holds {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("action code {0} is not one of the 5 defined actions")]
    InvalidAction(u8),

    #[error("position ({row}, {col}) is outside the grid")]
    InvalidPosition { row: i32, col: i32 },

    #[error("epsilon {0} must be in the interval [0, 1]")]
    InvalidEpsilon(f32),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::InvalidCount`] when `value` is zero
pub(crate) fn ensure_positive(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidCount { name, value });
    }
    Ok(())
}
