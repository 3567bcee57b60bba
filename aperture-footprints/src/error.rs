use thiserror::Error;

pub type FootprintResult<T> = Result<T, FootprintError>;

#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("aperture table {name}: {rows} rows is not a multiple of 5")]
    CorruptApertureTable { name: String, rows: usize },

    #[error("aperture table {name}: row {line}: {message}")]
    MalformedRow {
        name: String,
        line: usize,
        message: String,
    },

    #[error("aperture table {name}: too few rows for the instrument's rotation-center corners")]
    MissingCenterCorners { name: String },

    #[error("unknown dither pattern '{0}'")]
    UnknownPattern(String),

    #[error("unknown instrument '{0}' (expected long, short, or msa)")]
    UnknownInstrument(String),

    #[error("mosaic offsets are not supported with the {0} dither pattern")]
    MosaicUnsupported(&'static str),

    #[error(transparent)]
    Core(#[from] aperture_core::CoreError),

    #[error(transparent)]
    Wcs(#[from] aperture_wcs::WcsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
