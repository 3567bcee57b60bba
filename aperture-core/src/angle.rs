//! Angle normalization, spherical primitives, and coordinate parsing.
//!
//! # Wrapping
//!
//! Position angles and right ascensions are cyclic; [`wrap_360`] maps any
//! finite value into [0, 360). Wrapping uses `libm::fmod` rather than the
//! `%` operator because Rust's `%` is a remainder, not a modulo, and the two
//! differ for negative inputs.
//!
//! # Spherical primitives
//!
//! [`angular_separation`] is the great-circle distance via the spherical law
//! of cosines. The `acos` argument is clamped to [-1, 1] before the call:
//! floating-point overshoot for nearly-coincident or nearly-antipodal points
//! is an expected correction, not an error.
//!
//! # Coordinate parsing
//!
//! Target coordinates arrive either as decimal degrees or as space-separated
//! sexagesimal triples (`"13 29 52.70"` for RA in hours,
//! `"+47 11 42.67"` for Dec in degrees). Sexagesimal form is detected by the
//! presence of internal whitespace; a pair where only one field is
//! sexagesimal is ambiguous and rejected.

use crate::error::{CoreError, CoreResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Wraps an angle in degrees into [0, 360).
pub fn wrap_360(angle_deg: f64) -> f64 {
    let r = libm::fmod(angle_deg, 360.0);
    if r < 0.0 {
        r + 360.0
    } else {
        r
    }
}

/// Great-circle separation of two directions, all angles in radians.
///
/// Symmetric in its arguments and zero for coincident points. Never raises
/// a domain error: the cosine is clamped to [-1, 1] before the `acos`.
pub fn angular_separation(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let x = libm::cos(dec2) * libm::cos(dec1) * libm::cos(ra2 - ra1)
        + libm::sin(dec2) * libm::sin(dec1);
    libm::acos(x.clamp(-1.0, 1.0))
}

/// Bearing of `(ra2, dec2)` as seen from `(ra1, dec1)`, radians.
///
/// Measured from north through east, in (-pi, pi].
pub fn position_angle(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let y = libm::cos(dec2) * libm::sin(ra2 - ra1);
    let x = libm::sin(dec2) * libm::cos(dec1) - libm::cos(dec2) * libm::sin(dec1) * libm::cos(ra2 - ra1);
    libm::atan2(y, x)
}

static SEXAGESIMAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-])?(\d{1,3})\s+(\d{1,2})\s+(\d{1,2}(?:\.\d+)?)\s*$").unwrap()
});

fn parse_sexagesimal(s: &str, what: &str) -> CoreResult<f64> {
    let caps = SEXAGESIMAL_RE
        .captures(s)
        .ok_or_else(|| CoreError::parse(format!("cannot parse {} '{}' as 'D M S'", what, s)))?;
    let sign = caps
        .get(1)
        .map_or(1.0, |m| if m.as_str() == "-" { -1.0 } else { 1.0 });
    let d: f64 = caps[2].parse().unwrap();
    let m: f64 = caps[3].parse().unwrap();
    let sec: f64 = caps[4].parse().unwrap();
    if m >= 60.0 || sec >= 60.0 {
        return Err(CoreError::parse(format!(
            "minutes and seconds must be below 60 in {} '{}'",
            what, s
        )));
    }
    Ok(sign * (d + m / 60.0 + sec / 3600.0))
}

fn parse_decimal(s: &str, what: &str) -> CoreResult<f64> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| CoreError::parse(format!("cannot parse {} '{}' as a number", what, s)))?;
    if !value.is_finite() {
        return Err(CoreError::parse(format!("{} '{}' is not finite", what, s)));
    }
    Ok(value)
}

fn is_sexagesimal(s: &str) -> bool {
    s.trim().contains(char::is_whitespace)
}

/// Parses a right ascension, returning degrees in [0, 360).
///
/// Accepts decimal degrees (`"202.46958"`) or sexagesimal hours
/// (`"13 29 52.70"`, 1 hour = 15 degrees).
pub fn parse_ra(s: &str) -> CoreResult<f64> {
    let deg = if is_sexagesimal(s) {
        15.0 * parse_sexagesimal(s, "right ascension")?
    } else {
        parse_decimal(s, "right ascension")?
    };
    Ok(wrap_360(deg))
}

/// Parses a declination, returning degrees in [-90, +90].
///
/// Accepts decimal degrees (`"47.19519"`) or sexagesimal degrees
/// (`"+47 11 42.67"`).
pub fn parse_dec(s: &str) -> CoreResult<f64> {
    let deg = if is_sexagesimal(s) {
        parse_sexagesimal(s, "declination")?
    } else {
        parse_decimal(s, "declination")?
    };
    if deg.abs() > 90.0 {
        return Err(CoreError::parse(format!(
            "declination '{}' outside [-90, +90]",
            s
        )));
    }
    Ok(deg)
}

/// Parses an (RA, Dec) pair, returning degrees.
///
/// Sexagesimal form must be used for both fields or neither; a mixed pair is
/// ambiguous and rejected.
pub fn parse_target(ra: &str, dec: &str) -> CoreResult<(f64, f64)> {
    if is_sexagesimal(ra) != is_sexagesimal(dec) {
        return Err(CoreError::parse(format!(
            "mixed coordinate formats: '{}' / '{}' (use sexagesimal for both fields or neither)",
            ra, dec
        )));
    }
    Ok((parse_ra(ra)?, parse_dec(dec)?))
}
