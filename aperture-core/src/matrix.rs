//! Rotation matrices and the instrument-to-sky attitude transformation.
//!
//! The attitude matrix maps a unit vector expressed in instrument-frame
//! (v2, v3) coordinates to a sky-frame (RA, Dec) unit vector for a given
//! target pointing and position angle. It is composed from five elemental
//! rotations; the composition order is load-bearing -- swapping any pair
//! changes the resulting sky position.
//!
//! Rotations here are active right-handed rotations about a principal axis:
//! `elementary(Axis::Z, 90)` takes `[1, 0, 0]` to `[0, 1, 0]`.

use crate::error::{CoreError, CoreResult};
use crate::vector::Vector3;

/// Principal rotation axis.
///
/// A closed set so that an out-of-range axis is unrepresentable past the
/// input boundary; [`Axis::from_index`] performs the boundary check for
/// callers that start from raw integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Maps the conventional 1/2/3 axis numbering onto the enum.
    ///
    /// Anything outside {1, 2, 3} is an input-contract violation.
    pub fn from_index(index: u8) -> CoreResult<Self> {
        match index {
            1 => Ok(Axis::X),
            2 => Ok(Axis::Y),
            3 => Ok(Axis::Z),
            other => Err(CoreError::InvalidAxis(other)),
        }
    }
}

/// A 3x3 rotation matrix, row-major storage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationMatrix3 {
    elements: [[f64; 3]; 3],
}

impl RotationMatrix3 {
    pub fn identity() -> Self {
        Self {
            elements: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn from_array(elements: [[f64; 3]; 3]) -> Self {
        Self { elements }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.elements[row][col]
    }

    /// Active right-handed rotation by `angle_deg` about a principal axis.
    pub fn elementary(axis: Axis, angle_deg: f64) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        match axis {
            Axis::X => Self::from_array([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]),
            Axis::Y => Self::from_array([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]),
            Axis::Z => Self::from_array([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]),
        }
    }

    /// Matrix product `self * other`; `other` acts first on a vector.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = [[0.0; 3]; 3];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                for k in 0..3 {
                    *cell += self.elements[i][k] * other.elements[k][j];
                }
            }
        }
        Self::from_array(result)
    }

    /// For a proper rotation the transpose equals the inverse.
    pub fn transpose(&self) -> Self {
        let m = &self.elements;
        Self::from_array([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.elements;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Checks determinant +1 and orthogonality within `tolerance`.
    pub fn is_rotation_matrix(&self, tolerance: f64) -> bool {
        if (self.determinant() - 1.0).abs() > tolerance {
            return false;
        }
        let product = self.multiply(&self.transpose());
        let identity = Self::identity();
        for i in 0..3 {
            for j in 0..3 {
                if (product.elements[i][j] - identity.elements[i][j]).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Standard matrix-vector product `M * v`.
    pub fn apply(&self, v: Vector3) -> Vector3 {
        let m = &self.elements;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl std::ops::Mul for RotationMatrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl std::ops::Mul<Vector3> for RotationMatrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.apply(v)
    }
}

impl std::ops::Index<(usize, usize)> for RotationMatrix3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.elements[row][col]
    }
}

/// Builds the attitude matrix for a pointing.
///
/// `v2_arcsec`/`v3_arcsec` locate the rotation reference point in the
/// instrument frame; `ra_deg`/`dec_deg` are the commanded sky position of
/// that point and `pa_deg` the position angle of the roll about it.
///
/// The composition is `Mra * Mdec * Mpa * Mv3 * Mv2` with the rightmost
/// factor applied first:
///
/// ```text
/// Mv2  = Rz(-v2 / 3600)     Mv3 = Ry(v3 / 3600)
/// Mpa  = Rx(-pa)            Mdec = Ry(-dec)       Mra = Rz(ra)
/// ```
///
/// The reference point itself always maps back to the commanded pointing:
/// `pointing(&attitude_matrix(v2, v3, ra, dec, pa), v2, v3) == (ra, dec)`.
pub fn attitude_matrix(
    v2_arcsec: f64,
    v3_arcsec: f64,
    ra_deg: f64,
    dec_deg: f64,
    pa_deg: f64,
) -> RotationMatrix3 {
    let v2_deg = v2_arcsec / 3600.0;
    let v3_deg = v3_arcsec / 3600.0;

    let mv2 = RotationMatrix3::elementary(Axis::Z, -v2_deg);
    let mv3 = RotationMatrix3::elementary(Axis::Y, v3_deg);
    let mpa = RotationMatrix3::elementary(Axis::X, -pa_deg);
    let mdec = RotationMatrix3::elementary(Axis::Y, -dec_deg);
    let mra = RotationMatrix3::elementary(Axis::Z, ra_deg);

    mra * (mdec * (mpa * (mv3 * mv2)))
}

/// Projects an instrument-frame position through an attitude matrix.
///
/// Returns the `(ra_deg, dec_deg)` the `(v2_arcsec, v3_arcsec)` position
/// points at on the sky.
pub fn pointing(attitude: &RotationMatrix3, v2_arcsec: f64, v3_arcsec: f64) -> CoreResult<(f64, f64)> {
    let v = Vector3::from_sky(v2_arcsec / 3600.0, v3_arcsec / 3600.0);
    attitude.apply(v).to_sky()
}

/// In-plane rotate-and-shift of focal-plane coordinates.
///
/// Used to reposition aperture corner arrays in the (v2, v3) plane prior to
/// attitude composition:
///
/// ```text
/// x' = xshift + xscale*cos(theta)*(x - xref) + yscale*sin(theta)*(y - yref)
/// y' = yshift - xscale*sin(theta)*(x - xref) + yscale*cos(theta)*(y - yref)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InPlaneTransform {
    pub theta_deg: f64,
    pub xshift: f64,
    pub yshift: f64,
    pub xscale: f64,
    pub yscale: f64,
    pub xref: f64,
    pub yref: f64,
}

impl InPlaneTransform {
    /// Pure rotation by `theta_deg` about `(xref, yref)`, mapping the
    /// reference point onto itself.
    pub fn rotation_about(theta_deg: f64, xref: f64, yref: f64) -> Self {
        Self {
            theta_deg,
            xshift: xref,
            yshift: yref,
            xscale: 1.0,
            yscale: 1.0,
            xref,
            yref,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (s, c) = self.theta_deg.to_radians().sin_cos();
        let dx = x - self.xref;
        let dy = y - self.yref;
        let xp = self.xshift + self.xscale * c * dx + self.yscale * s * dy;
        let yp = self.yshift - self.xscale * s * dx + self.yscale * c * dy;
        (xp, yp)
    }
}
