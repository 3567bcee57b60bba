//! Target visibility and allowed roll-angle computation.
//!
//! Given a time-tagged ephemeris of the observatory-to-sun direction, this
//! crate answers, for any target and time: is the target inside the field of
//! regard, what is the nominal position angle, and how far may the vehicle
//! roll about the boresight without violating the sun-avoidance envelope.
//! A timeline scan walks a date range, locates field-of-regard transitions
//! by bisection, and produces per-day allowed position-angle windows.

pub mod constraint;
pub mod ephemeris;
pub mod error;
pub mod solver;
pub mod timeline;

pub use ephemeris::Ephemeris;
pub use error::{VisibilityError, VisibilityResult};
pub use timeline::{Coverage, DailyRoll, ScanOutcome, ScanRequest, VisibilityWindow};
