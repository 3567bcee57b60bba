//! Linear world-coordinate-system support for footprint rendering.
//!
//! The footprint pipeline ends by converting projected sky positions into
//! image pixel coordinates. This crate provides exactly that collaborator: a
//! gnomonic (TAN) projection about a reference sky position combined with a
//! CRPIX/CD linear pixel transform, built from a plain-text subset of FITS
//! header keywords.
//!
//! The resulting [`ImageWcs`] is an explicit value passed by reference into
//! every conversion -- there is no process-wide current-WCS state.

pub mod coordinate;
pub mod error;
pub mod header;
pub mod linear;
pub mod projection;

pub use coordinate::{IntermediateCoord, PixelCoord, SkyCoord};
pub use error::{WcsError, WcsResult};
pub use header::{ImageWcs, KeywordMap};
pub use linear::LinearTransform;
pub use projection::TanProjection;
