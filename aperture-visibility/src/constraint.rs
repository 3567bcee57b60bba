//! The sun-avoidance attitude envelope.
//!
//! The observatory may pitch only so far toward or away from the sun, and
//! may roll about the sun line only within a pitch-dependent ceiling. The
//! hard part is [`max_allowed_vehicle_roll`]: the roll limit about the
//! *boresight* depends on the sun pitch, which itself depends on the roll,
//! so the pair is solved by fixed-point iteration.
//!
//! All angles in this module are radians. `asin`/`acos` arguments are always
//! clamped to [-1, 1]; overshoot from floating-point drift is an expected
//! correction, not an error.

use crate::error::{VisibilityError, VisibilityResult};
use aperture_core::angular_separation;
use aperture_core::constants::{DEG_TO_RAD, HALF_PI};
use aperture_core::Vector3;

/// Absolute ceiling on the roll about the sun line.
pub const MAX_SUN_ROLL_RAD: f64 = 5.2 * DEG_TO_RAD;

/// Sun pitch at which the roll ceiling starts to shrink.
pub const SUN_ROLL_KNEE_PITCH_RAD: f64 = 2.5 * DEG_TO_RAD;

/// Roll allowance lost per radian of sun pitch past the knee.
pub const SUN_ROLL_SLOPE: f64 = 1.7 / (5.2 - 2.5);

/// Fixed margin kept away from the envelope edge.
pub const SUN_ROLL_MARGIN_RAD: f64 = 0.1 * DEG_TO_RAD;

/// Vehicle pitch window defining the field of regard: the observatory may
/// pitch well away from the sun but only a few degrees toward it (the
/// envelope's roll ceiling collapses right above the positive limit).
pub const MIN_VEHICLE_PITCH_RAD: f64 = -45.0 * DEG_TO_RAD;
pub const MAX_VEHICLE_PITCH_RAD: f64 = 5.2 * DEG_TO_RAD;

const ROLL_CONVERGENCE_RAD: f64 = 1.0e-4 * DEG_TO_RAD;
const MAX_ROLL_ITERATIONS: usize = 100;

/// Pitch of a body-frame sun direction: `atan2(x, -z)`.
///
/// Zero when the sun sits on the anti-V3 side, perpendicular to the
/// boresight.
#[inline]
pub fn sun_pitch(sun_body: &Vector3) -> f64 {
    libm::atan2(sun_body.x, -sun_body.z)
}

/// Roll of a body-frame sun direction: `asin(-y)`.
#[inline]
pub fn sun_roll(sun_body: &Vector3) -> f64 {
    libm::asin((-sun_body.y).clamp(-1.0, 1.0))
}

/// Maximum allowed roll about the sun line for a given sun pitch.
///
/// Constant at 5.2 degrees up to 2.5 degrees of pitch, then decreasing
/// linearly; the 0.1 degree margin is subtracted in all cases.
pub fn max_allowed_sun_roll(sun_pitch: f64) -> f64 {
    let mut max_roll = MAX_SUN_ROLL_RAD;
    if sun_pitch > SUN_ROLL_KNEE_PITCH_RAD {
        max_roll -= SUN_ROLL_SLOPE * (sun_pitch - SUN_ROLL_KNEE_PITCH_RAD);
    }
    max_roll - SUN_ROLL_MARGIN_RAD
}

/// Maximum allowed roll about the boresight for a sun/target geometry.
///
/// Solves the coupled sun-pitch/sun-roll pair by fixed-point iteration
/// starting from the absolute roll ceiling, then converts the converged sun
/// roll into a boresight roll. Iteration stops when successive sun-roll
/// values agree within 0.0001 degrees; exceeding the iteration cap is a
/// [`ConvergenceFailure`](VisibilityError::ConvergenceFailure). The result
/// is clamped to be non-negative (the envelope shrinks to nothing at deep
/// pitch).
///
/// All four coordinates in radians; the result is radians.
pub fn max_allowed_vehicle_roll(
    sun_ra: f64,
    sun_dec: f64,
    ra: f64,
    dec: f64,
) -> VisibilityResult<f64> {
    let vehicle_pitch = HALF_PI - angular_separation(sun_ra, sun_dec, ra, dec);

    let mut roll = MAX_SUN_ROLL_RAD;
    let mut last = f64::INFINITY;
    let mut iterations = 0;
    while (roll - last).abs() > ROLL_CONVERGENCE_RAD {
        if iterations >= MAX_ROLL_ITERATIONS {
            return Err(VisibilityError::ConvergenceFailure { iterations });
        }
        last = roll;
        let pitch = libm::asin((libm::sin(vehicle_pitch) / libm::cos(last)).clamp(-1.0, 1.0));
        roll = max_allowed_sun_roll(pitch);
        iterations += 1;
    }

    let boresight = libm::asin((libm::sin(roll) / libm::cos(vehicle_pitch)).clamp(-1.0, 1.0));
    Ok(boresight.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_core::constants::RAD_TO_DEG;

    #[test]
    fn sun_roll_ceiling_constant_below_knee() {
        for pitch_deg in [-5.0, 0.0, 1.0, 2.5] {
            let roll = max_allowed_sun_roll(pitch_deg * DEG_TO_RAD) * RAD_TO_DEG;
            assert!((roll - 5.1).abs() < 1e-12, "pitch {}: roll {}", pitch_deg, roll);
        }
    }

    #[test]
    fn sun_roll_ceiling_monotonically_non_increasing() {
        let mut previous = f64::INFINITY;
        let mut pitch_deg = 2.5;
        while pitch_deg <= 45.0 {
            let roll = max_allowed_sun_roll(pitch_deg * DEG_TO_RAD);
            assert!(roll <= previous + 1e-15, "pitch {}", pitch_deg);
            previous = roll;
            pitch_deg += 0.5;
        }
    }

    #[test]
    fn sun_roll_ceiling_loses_allowance_at_documented_slope() {
        let at_limit = max_allowed_sun_roll(5.2 * DEG_TO_RAD) * RAD_TO_DEG;
        // 5.2 - 1.7 - 0.1 at the pitch equal to the absolute roll ceiling.
        assert!((at_limit - 3.4).abs() < 1e-9, "roll {}", at_limit);
    }

    #[test]
    fn vehicle_roll_converges_across_pitch_range() {
        // Sweep vehicle pitch through [0, 90) by placing the target at the
        // matching separation from a sun at the origin.
        let mut pitch_deg = 0.0;
        while pitch_deg < 90.0 {
            let separation = (90.0 - pitch_deg) * DEG_TO_RAD;
            let roll = max_allowed_vehicle_roll(0.0, 0.0, separation, 0.0)
                .unwrap_or_else(|e| panic!("pitch {}: {}", pitch_deg, e));
            assert!(
                (0.0..=MAX_SUN_ROLL_RAD + 1e-12).contains(&roll),
                "pitch {}: roll {}",
                pitch_deg,
                roll * RAD_TO_DEG
            );
            pitch_deg += 0.5;
        }
    }

    #[test]
    fn vehicle_roll_near_zero_pitch_matches_sun_roll_ceiling() {
        let roll = max_allowed_vehicle_roll(0.0, 0.0, HALF_PI, 0.0).unwrap();
        assert!((roll * RAD_TO_DEG - 5.1).abs() < 1e-6, "roll {}", roll * RAD_TO_DEG);
    }

    #[test]
    fn body_frame_decomposition() {
        // Sun on the anti-V3 side, perpendicular to the boresight.
        let sun = Vector3::new(0.0, 0.0, -1.0);
        assert!(sun_pitch(&sun).abs() < 1e-15);
        assert!(sun_roll(&sun).abs() < 1e-15);

        // Pitch the sun 10 degrees toward the boresight.
        let p = 10.0 * DEG_TO_RAD;
        let sun = Vector3::new(libm::sin(p), 0.0, -libm::cos(p));
        assert!((sun_pitch(&sun) - p).abs() < 1e-12);

        // Roll moves the sun out of the x/z plane.
        let r = 4.0 * DEG_TO_RAD;
        let sun = Vector3::new(0.0, -libm::sin(r), -libm::cos(r));
        assert!((sun_roll(&sun) - r).abs() < 1e-12);
    }

    #[test]
    fn sun_roll_clamps_degenerate_input() {
        let sun = Vector3::new(0.0, -1.0000000000000002, 0.0);
        assert!(sun_roll(&sun).is_finite());
    }
}
