//! The sun ephemeris table.
//!
//! A dense, time-tagged table of the apparent sun direction covering the
//! mission's operational window. Loaded once, immutable afterwards; safe to
//! share by reference across independent scans.
//!
//! # File format
//!
//! Whitespace-delimited text, `#` starts a comment line. Data rows are
//! either three columns (`MJD sun_ra_deg sun_dec_deg`) or four columns
//! (`MJD x y z`: the observatory position relative to the sun, any length
//! unit; the sun direction is the negated, normalized vector). The layout is
//! fixed by the first data row; later rows with a different column count are
//! rejected. Times must be strictly increasing.
//!
//! # Range policy
//!
//! Queries a little before the table start are tolerated: the query is
//! clamped to `min + 1` day with a logged warning, so a search window that
//! starts slightly early still works. Queries past the table end are
//! rejected -- extrapolating the sun position beyond the table's validity
//! would silently fabricate data.

use crate::error::{VisibilityError, VisibilityResult};
use aperture_core::Vector3;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct Sample {
    mjd: f64,
    sun_dir: Vector3,
}

#[derive(Debug, Clone)]
pub struct Ephemeris {
    name: String,
    samples: Vec<Sample>,
}

impl Ephemeris {
    /// Builds a table from `(mjd, sun_ra_deg, sun_dec_deg)` triples.
    pub fn from_positions(
        name: &str,
        positions: &[(f64, f64, f64)],
    ) -> VisibilityResult<Self> {
        let samples = positions
            .iter()
            .map(|&(mjd, ra, dec)| Sample {
                mjd,
                sun_dir: Vector3::from_sky(ra, dec),
            })
            .collect();
        Self::from_samples(name, samples)
    }

    fn from_samples(name: &str, samples: Vec<Sample>) -> VisibilityResult<Self> {
        if samples.len() < 2 {
            return Err(VisibilityError::Empty {
                name: name.to_string(),
            });
        }
        for (i, pair) in samples.windows(2).enumerate() {
            if pair[1].mjd <= pair[0].mjd {
                return Err(VisibilityError::NonMonotonic {
                    name: name.to_string(),
                    line: i + 2,
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            samples,
        })
    }

    pub fn parse(name: &str, text: &str) -> VisibilityResult<Self> {
        let mut samples = Vec::new();
        let mut layout: Option<usize> = None;
        let mut last_mjd = f64::NEG_INFINITY;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            let expected = *layout.get_or_insert(cols.len());
            if !(expected == 3 || expected == 4) {
                return Err(VisibilityError::Parse {
                    name: name.to_string(),
                    line: line_no + 1,
                    message: format!("expected 3 or 4 columns, found {}", cols.len()),
                });
            }
            if cols.len() != expected {
                return Err(VisibilityError::Parse {
                    name: name.to_string(),
                    line: line_no + 1,
                    message: format!("expected {} columns, found {}", expected, cols.len()),
                });
            }
            let field = |idx: usize| -> VisibilityResult<f64> {
                cols[idx].parse().map_err(|_| VisibilityError::Parse {
                    name: name.to_string(),
                    line: line_no + 1,
                    message: format!("'{}' is not a number", cols[idx]),
                })
            };
            let mjd = field(0)?;
            if mjd <= last_mjd {
                return Err(VisibilityError::NonMonotonic {
                    name: name.to_string(),
                    line: line_no + 1,
                });
            }
            last_mjd = mjd;

            let sun_dir = if expected == 3 {
                Vector3::from_sky(field(1)?, field(2)?)
            } else {
                // Observatory relative to sun; the sun appears opposite.
                (-Vector3::new(field(1)?, field(2)?, field(3)?)).normalize()
            };
            samples.push(Sample { mjd, sun_dir });
        }

        Self::from_samples(name, samples)
    }

    pub fn load(path: &Path) -> VisibilityResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    pub fn min_mjd(&self) -> f64 {
        self.samples[0].mjd
    }

    pub fn max_mjd(&self) -> f64 {
        self.samples[self.samples.len() - 1].mjd
    }

    /// Apparent sun position `(ra_deg, dec_deg)` at `mjd`.
    ///
    /// Interpolates linearly between the bracketing samples (renormalizing
    /// the direction). See the module docs for the out-of-range policy.
    pub fn sun_position(&self, mjd: f64) -> VisibilityResult<(f64, f64)> {
        Ok(self.sun_vector(mjd)?.to_sky()?)
    }

    /// Apparent sun direction as a unit vector at `mjd`.
    pub fn sun_vector(&self, mjd: f64) -> VisibilityResult<Vector3> {
        let mjd = self.clamp_query(mjd)?;

        let upper = self.samples.partition_point(|s| s.mjd < mjd);
        let v = if upper == 0 {
            self.samples[0].sun_dir
        } else if upper == self.samples.len() {
            self.samples[upper - 1].sun_dir
        } else {
            let lo = self.samples[upper - 1];
            let hi = self.samples[upper];
            let t = (mjd - lo.mjd) / (hi.mjd - lo.mjd);
            lo.sun_dir * (1.0 - t) + hi.sun_dir * t
        };
        Ok(v.normalize())
    }

    fn clamp_query(&self, mjd: f64) -> VisibilityResult<f64> {
        let min = self.min_mjd();
        let max = self.max_mjd();
        if mjd > max {
            return Err(VisibilityError::RangeExceeded { query: mjd, max });
        }
        if mjd < min {
            let clamped = (min + 1.0).min(max);
            warn!(
                ephemeris = %self.name,
                query = mjd,
                clamped,
                "query before ephemeris start, clamping"
            );
            return Ok(clamped);
        }
        Ok(mjd)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Ephemeris;

    /// A sun marching along a circular ecliptic, sampled daily.
    pub fn circular_sun_ephemeris(start_mjd: f64, days: usize) -> Ephemeris {
        let obliquity = 23.43929_f64.to_radians();
        let positions: Vec<(f64, f64, f64)> = (0..=days)
            .map(|i| {
                let t = i as f64;
                let lambda = std::f64::consts::TAU * t / 365.25;
                let ra = libm::atan2(obliquity.cos() * libm::sin(lambda), libm::cos(lambda));
                let dec = libm::asin(obliquity.sin() * libm::sin(lambda));
                (
                    start_mjd + t,
                    aperture_core::wrap_360(ra.to_degrees()),
                    dec.to_degrees(),
                )
            })
            .collect();
        Ephemeris::from_positions("synthetic-sun", &positions).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Ephemeris {
        // Sun marching 1 degree per day along the equator.
        let positions: Vec<(f64, f64, f64)> = (0..=100)
            .map(|i| (58000.0 + i as f64, i as f64, 0.0))
            .collect();
        Ephemeris::from_positions("test", &positions).unwrap()
    }

    #[test]
    fn interpolates_between_samples() {
        let eph = table();
        let (ra, dec) = eph.sun_position(58010.5).unwrap();
        assert!((ra - 10.5).abs() < 1e-6, "ra {}", ra);
        assert!(dec.abs() < 1e-9);
    }

    #[test]
    fn exact_sample_times() {
        let eph = table();
        let (ra, _) = eph.sun_position(58000.0).unwrap();
        assert!(ra.abs() < 1e-12);
        let (ra, _) = eph.sun_position(58100.0).unwrap();
        assert!((ra - 100.0).abs() < 1e-9);
    }

    #[test]
    fn query_before_start_clamps_to_min_plus_one() {
        let eph = table();
        let clamped = eph.sun_position(57990.0).unwrap();
        let reference = eph.sun_position(58001.0).unwrap();
        assert_eq!(clamped, reference);
    }

    #[test]
    fn query_past_end_rejected() {
        let eph = table();
        let err = eph.sun_position(58100.5).unwrap_err();
        assert!(matches!(err, VisibilityError::RangeExceeded { .. }));
    }

    #[test]
    fn parses_spherical_layout() {
        let text = "\
# mjd ra dec
58000.0  10.0  -1.0
58001.0  11.0  -0.9
58002.0  12.0  -0.8";
        let eph = Ephemeris::parse("spherical", text).unwrap();
        let (ra, dec) = eph.sun_position(58001.0).unwrap();
        assert!((ra - 11.0).abs() < 1e-9);
        assert!((dec + 0.9).abs() < 1e-9);
    }

    #[test]
    fn parses_cartesian_layout_with_negated_direction() {
        // Observatory at +x from the sun: the sun appears at ra=180.
        let text = "\
58000.0  1.496e8  0.0  0.0
58001.0  1.496e8  0.0  0.0";
        let eph = Ephemeris::parse("cartesian", text).unwrap();
        let (ra, dec) = eph.sun_position(58001.0).unwrap();
        assert!((ra - 180.0).abs() < 1e-9);
        assert!(dec.abs() < 1e-9);
    }

    #[test]
    fn mixed_column_counts_rejected() {
        let text = "58000.0 10.0 0.0\n58001.0 11.0 0.0 5.0";
        let err = Ephemeris::parse("mixed", text).unwrap_err();
        assert!(matches!(err, VisibilityError::Parse { line: 2, .. }));
    }

    #[test]
    fn non_monotonic_times_rejected() {
        let text = "58001.0 10.0 0.0\n58001.0 11.0 0.0";
        let err = Ephemeris::parse("flat", text).unwrap_err();
        assert!(matches!(err, VisibilityError::NonMonotonic { line: 2, .. }));
    }

    #[test]
    fn single_sample_rejected() {
        let text = "58000.0 10.0 0.0";
        let err = Ephemeris::parse("single", text).unwrap_err();
        assert!(matches!(err, VisibilityError::Empty { .. }));
    }
}
