use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("cannot extract sky coordinates from a zero-length vector")]
    DegenerateVector,

    #[error("rotation axis must be 1, 2, or 3 (got {0})")]
    InvalidAxis(u8),
}

impl CoreError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
