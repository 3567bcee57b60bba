use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] aperture_core::CoreError),

    #[error(transparent)]
    Wcs(#[from] aperture_wcs::WcsError),

    #[error(transparent)]
    Footprint(#[from] aperture_footprints::FootprintError),

    #[error(transparent)]
    Visibility(#[from] aperture_visibility::VisibilityError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration file: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("source catalog: line {line}: {message}")]
    SourceCatalog { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
