use std::f64::consts::PI;

use crate::{animation::ease::Ease, foundation::core::DurationMs};

/// Fixed transition length. Durations are not configurable per call.
pub const TRANSITION_DURATION: DurationMs = DurationMs(1000);

/// Full rotation carried by one transition.
pub const ROTATION_DEG: f64 = 90.0;

/// Smallest scale reached by the mid-flight bounce.
const MIN_SCALE: f64 = 0.82;

/// Peak off-axis wobble, radians.
const WOBBLE_MAX_RAD: f64 = 0.035;

/// Instantaneous cube attitude at one point of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubePose {
    /// Signed rotation around the transition axis, radians.
    pub angle_rad: f64,
    /// Uniform cube scale; dips below 1 mid-flight.
    pub scale: f64,
    /// Off-axis flourish rotation, radians. Zero at both endpoints.
    pub wobble_rad: f64,
}

/// Sample the cube attitude for `progress` in `[0, 1]`.
///
/// `direction_sign` is `+1.0` for forward rotation, `-1.0` for backward.
/// The rotation follows an in-out quartic; the scale bounce follows an
/// in-out back curve over a triangular envelope so the overshoot reads as
/// a settle; the wobble is a sine windowed to the middle of the flight.
pub fn sample_pose(progress: f64, direction_sign: f64) -> CubePose {
    let t = progress.clamp(0.0, 1.0);

    let angle_rad = direction_sign * ROTATION_DEG.to_radians() * Ease::InOutQuart.apply(t);

    let envelope = Ease::InOutBack.apply(1.0 - (2.0 * t - 1.0).abs());
    let scale = 1.0 - (1.0 - MIN_SCALE) * envelope;

    let window = (PI * t).sin().powi(2);
    let wobble_rad = WOBBLE_MAX_RAD * (3.0 * PI * t).sin() * window;

    CubePose {
        angle_rad,
        scale,
        wobble_rad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_endpoints_are_identity_and_quarter_turn() {
        let start = sample_pose(0.0, 1.0);
        assert!(start.angle_rad.abs() < 1e-12);
        assert!((start.scale - 1.0).abs() < 1e-12);
        assert!(start.wobble_rad.abs() < 1e-12);

        let end = sample_pose(1.0, 1.0);
        assert!((end.angle_rad - 90f64.to_radians()).abs() < 1e-12);
        assert!((end.scale - 1.0).abs() < 1e-9);
        assert!(end.wobble_rad.abs() < 1e-9);
    }

    #[test]
    fn direction_sign_flips_rotation() {
        let fwd = sample_pose(0.5, 1.0);
        let bwd = sample_pose(0.5, -1.0);
        assert!((fwd.angle_rad + bwd.angle_rad).abs() < 1e-12);
    }

    #[test]
    fn scale_dips_mid_flight() {
        let mid = sample_pose(0.5, 1.0);
        assert!(mid.scale < 1.0);
        assert!(mid.scale > 0.5);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(sample_pose(2.0, 1.0), sample_pose(1.0, 1.0));
        assert_eq!(sample_pose(-1.0, 1.0), sample_pose(0.0, 1.0));
    }
}
