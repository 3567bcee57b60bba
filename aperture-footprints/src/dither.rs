//! Dither and mosaic offset patterns.
//!
//! A pattern is an ordered sequence of (delta-v2, delta-v3) arcsecond shifts
//! applied to the rotation center before attitude composition; each shift
//! produces one repetition of the full aperture set. Pattern names are
//! validated once, here at the boundary; the rest of the pipeline only sees
//! the closed enum.

use crate::error::{FootprintError, FootprintResult};
use std::fmt;
use std::str::FromStr;

const NONE_SHIFTS: &[(f64, f64)] = &[(0.0, 0.0)];

const FULL3_SHIFTS: &[(f64, f64)] = &[(0.0, 0.0), (-58.0, -23.5), (58.0, 23.5)];

const FULL3TIGHT_SHIFTS: &[(f64, f64)] = &[(0.0, 0.0), (-58.0, -7.5), (58.0, 7.5)];

const FULL6_SHIFTS: &[(f64, f64)] = &[
    (-72.0, -30.0),
    (-43.0, -18.0),
    (-14.0, -6.0),
    (15.0, 6.0),
    (44.0, 18.0),
    (73.0, 30.0),
];

const EIGHT_SPEC_SHIFTS: &[(f64, f64)] = &[
    (-24.6, -64.1),
    (-24.4, -89.0),
    (24.6, -88.8),
    (24.4, -63.9),
    (24.6, 64.1),
    (24.4, 89.0),
    (-24.6, 88.8),
    (-24.4, 63.9),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherPattern {
    #[default]
    None,
    Full3,
    Full3Tight,
    Full6,
    EightSpec,
}

impl DitherPattern {
    pub fn shifts(&self) -> &'static [(f64, f64)] {
        match self {
            DitherPattern::None => NONE_SHIFTS,
            DitherPattern::Full3 => FULL3_SHIFTS,
            DitherPattern::Full3Tight => FULL3TIGHT_SHIFTS,
            DitherPattern::Full6 => FULL6_SHIFTS,
            DitherPattern::EightSpec => EIGHT_SPEC_SHIFTS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DitherPattern::None => "NONE",
            DitherPattern::Full3 => "FULL3",
            DitherPattern::Full3Tight => "FULL3TIGHT",
            DitherPattern::Full6 => "FULL6",
            DitherPattern::EightSpec => "8NIRSPEC",
        }
    }

    /// Whether a mosaic offset may be combined with this pattern.
    pub fn supports_mosaic(&self) -> bool {
        matches!(
            self,
            DitherPattern::None | DitherPattern::Full3 | DitherPattern::Full3Tight
        )
    }
}

impl fmt::Display for DitherPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherPattern {
    type Err = FootprintError;

    fn from_str(s: &str) -> FootprintResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(DitherPattern::None),
            "FULL3" => Ok(DitherPattern::Full3),
            "FULL3TIGHT" => Ok(DitherPattern::Full3Tight),
            "FULL6" => Ok(DitherPattern::Full6),
            "8NIRSPEC" => Ok(DitherPattern::EightSpec),
            other => Err(FootprintError::UnknownPattern(other.to_string())),
        }
    }
}

/// A user-specified secondary pointing offset (arcsec), tiling a second copy
/// of the aperture set alongside the first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MosaicOffset {
    pub dv2: f64,
    pub dv3: f64,
}

impl MosaicOffset {
    pub fn new(dv2: f64, dv3: f64) -> Self {
        Self { dv2, dv3 }
    }
}
