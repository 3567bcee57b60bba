//! Instrument aperture footprint projection.
//!
//! Given an instrument's fixed focal-plane aperture corner table, a target
//! pointing, a position angle, and a dither/mosaic selection, this crate
//! produces the projected sky polygon for every aperture across every
//! pattern repetition, and converts the result to image pixel coordinates
//! through an explicitly supplied WCS.

pub mod dither;
pub mod error;
pub mod instrument;
pub mod projector;

pub use dither::{DitherPattern, MosaicOffset};
pub use error::{FootprintError, FootprintResult};
pub use instrument::{ApertureCatalog, ApertureTable, Instrument};
pub use projector::{FootprintRequest, PixelFootprint, SkyFootprint};
