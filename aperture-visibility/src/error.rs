use thiserror::Error;

pub type VisibilityResult<T> = Result<T, VisibilityError>;

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("ephemeris {name}: line {line}: {message}")]
    Parse {
        name: String,
        line: usize,
        message: String,
    },

    #[error("ephemeris {name}: times must be strictly increasing (line {line})")]
    NonMonotonic { name: String, line: usize },

    #[error("ephemeris {name}: fewer than two usable samples")]
    Empty { name: String },

    #[error("query time {query:.3} is past the ephemeris end {max:.3}")]
    RangeExceeded { query: f64, max: f64 },

    #[error("roll solver failed to converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    #[error(transparent)]
    Core(#[from] aperture_core::CoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
