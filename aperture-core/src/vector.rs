//! 3D Cartesian vectors for sky and instrument-frame directions.
//!
//! Celestial positions are given as spherical coordinates (RA/Dec, or
//! instrument v2/v3 after arcsecond-to-degree conversion), but rotations are
//! cleanest in Cartesian form. The typical workflow is:
//!
//! 1. Convert spherical -> Cartesian with [`from_sky`](Vector3::from_sky)
//! 2. Apply an attitude or elementary rotation matrix
//! 3. Convert back with [`to_sky`](Vector3::to_sky)
//!
//! The conversion back normalizes by the vector norm before extracting
//! `dec = asin(z/norm)`, so a slightly denormalized product of many rotations
//! still yields a valid declination. A zero-length vector has no direction
//! and is rejected.

use crate::angle::wrap_360;
use crate::error::{CoreError, CoreResult};

/// A 3D Cartesian vector.
///
/// Components are public for direct access. In equatorial coordinates the
/// `x` axis points toward RA=0 on the equator, `y` toward RA=90, and `z`
/// toward the north celestial pole.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a unit vector from sky coordinates in degrees.
    ///
    /// Works equally for (RA, Dec) and for instrument-frame (v2, v3) after
    /// converting the arcsecond offsets to degrees.
    pub fn from_sky(ra_deg: f64, dec_deg: f64) -> Self {
        let (sin_ra, cos_ra) = libm::sincos(ra_deg.to_radians());
        let (sin_dec, cos_dec) = libm::sincos(dec_deg.to_radians());
        Self::new(cos_ra * cos_dec, sin_ra * cos_dec, sin_dec)
    }

    /// Converts the vector back to `(ra_deg, dec_deg)` with RA in [0, 360).
    ///
    /// The vector does not need to be normalized; the norm is divided out
    /// before the `asin`. A zero-length vector is a
    /// [`DegenerateVector`](CoreError::DegenerateVector) error.
    pub fn to_sky(&self) -> CoreResult<(f64, f64)> {
        let norm = self.magnitude();
        if norm == 0.0 {
            return Err(CoreError::DegenerateVector);
        }
        let dec = libm::asin((self.z / norm).clamp(-1.0, 1.0)).to_degrees();
        let ra = wrap_360(libm::atan2(self.y, self.x).to_degrees());
        Ok((ra, dec))
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Returns a unit vector in the same direction.
    ///
    /// The zero vector is returned unchanged (avoids NaN); callers that need
    /// a direction should go through [`to_sky`](Self::to_sky), which rejects
    /// the degenerate case.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            Self::new(self.x / mag, self.y / mag, self.z / mag)
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl std::ops::Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn from_sky_cardinal_directions() {
        let v = Vector3::from_sky(0.0, 0.0);
        assert!((v.x - 1.0).abs() < EPS);
        assert!(v.y.abs() < EPS);
        assert!(v.z.abs() < EPS);

        let v = Vector3::from_sky(90.0, 0.0);
        assert!(v.x.abs() < EPS);
        assert!((v.y - 1.0).abs() < EPS);

        let v = Vector3::from_sky(0.0, 90.0);
        assert!((v.z - 1.0).abs() < EPS);
    }

    #[test]
    fn sky_roundtrip() {
        for &(ra, dec) in &[
            (0.0, 0.0),
            (202.46959, 47.195187),
            (359.9, -89.5),
            (123.456, 67.89),
        ] {
            let (ra2, dec2) = Vector3::from_sky(ra, dec).to_sky().unwrap();
            assert!((ra2 - ra).abs() < 1e-9, "ra {} -> {}", ra, ra2);
            assert!((dec2 - dec).abs() < 1e-9, "dec {} -> {}", dec, dec2);
        }
    }

    #[test]
    fn negative_ra_wraps_into_range() {
        let (ra, _) = Vector3::from_sky(-10.0, 20.0).to_sky().unwrap();
        assert!((ra - 350.0).abs() < 1e-9);
    }

    #[test]
    fn to_sky_normalizes_before_extraction() {
        let v = Vector3::new(0.0, 0.0, 5.0);
        let (_, dec) = v.to_sky().unwrap();
        assert!((dec - 90.0).abs() < EPS);
    }

    #[test]
    fn zero_vector_is_degenerate() {
        let v = Vector3::new(0.0, 0.0, 0.0);
        assert!(matches!(v.to_sky(), Err(CoreError::DegenerateVector)));
    }

    #[test]
    fn normalize_and_dot() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        let unit = v.normalize();
        assert!((unit.magnitude() - 1.0).abs() < EPS);
        assert_eq!(unit, Vector3::new(0.6, 0.8, 0.0));

        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn arithmetic_operators() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
    }
}
