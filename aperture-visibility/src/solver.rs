//! Field-of-regard membership and position-angle queries for a target.
//!
//! These functions tie the ephemeris to the attitude envelope. Targets are
//! given in degrees (the interface convention); conversion to radians
//! happens here, once, at the boundary.

use crate::constraint::{
    max_allowed_sun_roll, max_allowed_vehicle_roll, sun_pitch, sun_roll, MAX_VEHICLE_PITCH_RAD,
    MIN_VEHICLE_PITCH_RAD,
};
use crate::ephemeris::Ephemeris;
use crate::error::VisibilityResult;
use aperture_core::constants::HALF_PI;
use aperture_core::matrix::attitude_matrix;
use aperture_core::{angular_separation, position_angle, wrap_360};

/// Vehicle pitch toward the sun for a target at `mjd`, radians.
///
/// Zero when the target is 90 degrees from the sun; positive when the
/// boresight tips toward it.
pub fn vehicle_pitch(eph: &Ephemeris, mjd: f64, ra_deg: f64, dec_deg: f64) -> VisibilityResult<f64> {
    let (sun_ra, sun_dec) = eph.sun_position(mjd)?;
    Ok(HALF_PI
        - angular_separation(
            sun_ra.to_radians(),
            sun_dec.to_radians(),
            ra_deg.to_radians(),
            dec_deg.to_radians(),
        ))
}

/// Whether the target can be observed at all at `mjd`.
///
/// True iff the vehicle pitch lies inside the sun-avoidance pitch window.
pub fn in_field_of_regard(
    eph: &Ephemeris,
    mjd: f64,
    ra_deg: f64,
    dec_deg: f64,
) -> VisibilityResult<bool> {
    let pitch = vehicle_pitch(eph, mjd, ra_deg, dec_deg)?;
    Ok((MIN_VEHICLE_PITCH_RAD..=MAX_VEHICLE_PITCH_RAD).contains(&pitch))
}

/// Whether the target can be observed at `mjd` with a fixed position angle.
///
/// Builds the attitude for the requested PA, rotates the sun direction into
/// the body frame, and checks the resulting sun pitch and roll against the
/// envelope.
pub fn is_valid_at_pa(
    eph: &Ephemeris,
    mjd: f64,
    ra_deg: f64,
    dec_deg: f64,
    pa_deg: f64,
) -> VisibilityResult<bool> {
    let sun_sky = eph.sun_vector(mjd)?;
    let attitude = attitude_matrix(0.0, 0.0, ra_deg, dec_deg, pa_deg);
    let sun_body = attitude.transpose().apply(sun_sky);

    let pitch = sun_pitch(&sun_body);
    if !(MIN_VEHICLE_PITCH_RAD..=MAX_VEHICLE_PITCH_RAD).contains(&pitch) {
        return Ok(false);
    }
    Ok(sun_roll(&sun_body).abs() <= max_allowed_sun_roll(pitch))
}

/// Nominal position angle at which the roll window is centered, degrees.
///
/// The anti-sun orientation: the bearing of the sun as seen from the target,
/// plus 180 degrees, wrapped into [0, 360).
pub fn normal_position_angle(
    eph: &Ephemeris,
    mjd: f64,
    ra_deg: f64,
    dec_deg: f64,
) -> VisibilityResult<f64> {
    let (sun_ra, sun_dec) = eph.sun_position(mjd)?;
    let bearing = position_angle(
        ra_deg.to_radians(),
        dec_deg.to_radians(),
        sun_ra.to_radians(),
        sun_dec.to_radians(),
    );
    Ok(wrap_360(bearing.to_degrees() + 180.0))
}

/// Maximum roll about the boresight at `mjd`, degrees.
pub fn max_boresight_roll(
    eph: &Ephemeris,
    mjd: f64,
    ra_deg: f64,
    dec_deg: f64,
) -> VisibilityResult<f64> {
    let (sun_ra, sun_dec) = eph.sun_position(mjd)?;
    let roll = max_allowed_vehicle_roll(
        sun_ra.to_radians(),
        sun_dec.to_radians(),
        ra_deg.to_radians(),
        dec_deg.to_radians(),
    )?;
    Ok(roll.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::test_support::circular_sun_ephemeris;

    const START: f64 = 58000.0;

    // North ecliptic pole: always 90 degrees from a sun on the ecliptic.
    const NEP_RA: f64 = 270.0;
    const NEP_DEC: f64 = 66.560708;

    #[test]
    fn ecliptic_pole_always_in_field_of_regard() {
        let eph = circular_sun_ephemeris(START, 400);
        for day in 0..365 {
            let mjd = START + day as f64;
            assert!(
                in_field_of_regard(&eph, mjd, NEP_RA, NEP_DEC).unwrap(),
                "day {}",
                day
            );
        }
    }

    #[test]
    fn mid_latitude_target_moves_in_and_out() {
        let eph = circular_sun_ephemeris(START, 400);
        let mut inside_days = 0;
        let mut outside_days = 0;
        for day in 0..365 {
            if in_field_of_regard(&eph, START + day as f64, 202.46959, 47.195187).unwrap() {
                inside_days += 1;
            } else {
                outside_days += 1;
            }
        }
        assert!(inside_days > 30, "inside {}", inside_days);
        assert!(outside_days > 30, "outside {}", outside_days);
    }

    #[test]
    fn anti_sun_target_is_outside() {
        // A target opposite the sun needs a -90 degree pitch: far outside.
        let eph = circular_sun_ephemeris(START, 400);
        let (sun_ra, sun_dec) = eph.sun_position(START + 50.0).unwrap();
        let inside =
            in_field_of_regard(&eph, START + 50.0, wrap_360(sun_ra + 180.0), -sun_dec).unwrap();
        assert!(!inside);
    }

    #[test]
    fn normal_pa_is_valid_and_far_pa_is_not() {
        let eph = circular_sun_ephemeris(START, 400);
        let (ra, dec) = (202.46959, 47.195187);
        // Find an in-field day first.
        let mjd = (0..365)
            .map(|d| START + d as f64)
            .find(|&t| in_field_of_regard(&eph, t, ra, dec).unwrap())
            .expect("target never observable");

        let normal = normal_position_angle(&eph, mjd, ra, dec).unwrap();
        assert!(is_valid_at_pa(&eph, mjd, ra, dec, normal).unwrap());
        assert!(!is_valid_at_pa(&eph, mjd, ra, dec, wrap_360(normal + 30.0)).unwrap());
    }

    #[test]
    fn pa_window_edges_agree_with_boresight_roll() {
        let eph = circular_sun_ephemeris(START, 400);
        let (ra, dec) = (202.46959, 47.195187);
        let mjd = (0..365)
            .map(|d| START + d as f64)
            .find(|&t| in_field_of_regard(&eph, t, ra, dec).unwrap())
            .expect("target never observable");

        let normal = normal_position_angle(&eph, mjd, ra, dec).unwrap();
        let roll = max_boresight_roll(&eph, mjd, ra, dec).unwrap();
        // Deep negative pitch dilutes the sun-roll limit, so the boresight
        // window can exceed the 5.2 degree sun-roll ceiling itself.
        assert!(roll > 0.0 && roll < 10.0, "roll {}", roll);

        // Just inside the window is valid, well outside is not.
        assert!(is_valid_at_pa(&eph, mjd, ra, dec, wrap_360(normal + 0.8 * roll)).unwrap());
        assert!(!is_valid_at_pa(&eph, mjd, ra, dec, wrap_360(normal + 3.0 * roll)).unwrap());
    }

    #[test]
    fn pitch_sign_convention() {
        // Target closer than 90 degrees to the sun pitches the vehicle
        // toward it (positive pitch).
        let eph = circular_sun_ephemeris(START, 400);
        let (sun_ra, sun_dec) = eph.sun_position(START + 10.0).unwrap();
        let pitch = vehicle_pitch(&eph, START + 10.0, wrap_360(sun_ra + 60.0), sun_dec).unwrap();
        assert!(pitch > 0.0);
    }
}
