use crate::coordinate::{IntermediateCoord, SkyCoord};
use crate::error::{WcsError, WcsResult};
use aperture_core::constants::RAD_TO_DEG;

/// Gnomonic (TAN) projection about a reference sky position.
///
/// Maps sky coordinates onto the tangent plane at CRVAL as standard
/// coordinates in degrees (x toward increasing RA, y toward north). The
/// projection diverges for directions 90 degrees or more from the tangent
/// point; those are rejected rather than returned as huge coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TanProjection {
    crval: SkyCoord,
    sin_dec0: f64,
    cos_dec0: f64,
}

impl TanProjection {
    pub fn new(crval: SkyCoord) -> Self {
        let (sin_dec0, cos_dec0) = libm::sincos(crval.dec_deg().to_radians());
        Self {
            crval,
            sin_dec0,
            cos_dec0,
        }
    }

    #[inline]
    pub fn crval(&self) -> SkyCoord {
        self.crval
    }

    pub fn sky_to_intermediate(&self, ra_deg: f64, dec_deg: f64) -> WcsResult<IntermediateCoord> {
        let delta_ra = (ra_deg - self.crval.ra_deg()).to_radians();
        let (sin_dra, cos_dra) = libm::sincos(delta_ra);
        let (sin_dec, cos_dec) = libm::sincos(dec_deg.to_radians());

        let cos_c = self.sin_dec0 * sin_dec + self.cos_dec0 * cos_dec * cos_dra;
        if cos_c <= 0.0 {
            return Err(WcsError::singularity(format!(
                "({:.5}, {:.5}) is 90 degrees or more from the tangent point",
                ra_deg, dec_deg
            )));
        }

        let xi = cos_dec * sin_dra / cos_c;
        let eta = (self.cos_dec0 * sin_dec - self.sin_dec0 * cos_dec * cos_dra) / cos_c;
        Ok(IntermediateCoord::new(xi * RAD_TO_DEG, eta * RAD_TO_DEG))
    }

    pub fn intermediate_to_sky(&self, inter: IntermediateCoord) -> (f64, f64) {
        let xi = inter.x_deg().to_radians();
        let eta = inter.y_deg().to_radians();

        let denom = self.cos_dec0 - eta * self.sin_dec0;
        let delta_ra = libm::atan2(xi, denom);
        let ra = self.crval.ra_deg() + delta_ra.to_degrees();
        let dec = libm::atan2(
            (self.sin_dec0 + eta * self.cos_dec0) * libm::cos(delta_ra),
            denom,
        )
        .to_degrees();
        (aperture_core::wrap_360(ra), dec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> TanProjection {
        TanProjection::new(SkyCoord::new(202.46959, 47.195187))
    }

    #[test]
    fn tangent_point_maps_to_origin() {
        let p = projection();
        let inter = p
            .sky_to_intermediate(202.46959, 47.195187)
            .unwrap();
        assert!(inter.x_deg().abs() < 1e-12);
        assert!(inter.y_deg().abs() < 1e-12);
    }

    #[test]
    fn north_offset_maps_to_positive_y() {
        let p = projection();
        let inter = p.sky_to_intermediate(202.46959, 47.295187).unwrap();
        assert!(inter.x_deg().abs() < 1e-9);
        assert!((inter.y_deg() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn east_offset_maps_to_positive_x() {
        let p = projection();
        let inter = p.sky_to_intermediate(202.56959, 47.195187).unwrap();
        assert!(inter.x_deg() > 0.0);
        // Foreshortened by cos(dec)
        assert!((inter.x_deg() - 0.1 * 47.195187_f64.to_radians().cos()).abs() < 1e-4);
    }

    #[test]
    fn roundtrip_through_plane() {
        let p = projection();
        for &(ra, dec) in &[
            (202.4, 47.1),
            (203.0, 46.8),
            (201.9, 47.6),
            (202.46959, 47.195187),
        ] {
            let inter = p.sky_to_intermediate(ra, dec).unwrap();
            let (ra2, dec2) = p.intermediate_to_sky(inter);
            assert!((ra2 - ra).abs() < 1e-9, "ra {} -> {}", ra, ra2);
            assert!((dec2 - dec).abs() < 1e-9, "dec {} -> {}", dec, dec2);
        }
    }

    #[test]
    fn far_side_rejected() {
        let p = projection();
        let result = p.sky_to_intermediate(22.46959, -47.195187);
        assert!(matches!(result, Err(WcsError::Singularity { .. })));
    }
}
