use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Attitude blending: heading + speed pitch + turn bank
// ---------------------------------------------------------------------------

pub const MAX_FORWARD_TILT_DEG: f64 = 20.0;
pub const MAX_BANK_DEG: f64 = 30.0;
pub const BANK_GAIN: f64 = -0.5;

/// Linear interpolation with `t` clamped to [0, 1].
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Signed angle from `from` to `to` in degrees, sign taken about `axis`.
/// Range (-180, 180]; a zero cross product counts as positive.
pub fn signed_angle_deg(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let denom = from.norm() * to.norm();
    if denom < 1e-15 {
        return 0.0;
    }
    let unsigned = (from.dot(to) / denom).clamp(-1.0, 1.0).acos().to_degrees();
    let sign = if axis.dot(&from.cross(to)) < 0.0 { -1.0 } else { 1.0 };
    unsigned * sign
}

/// Spherical interpolation toward `to`, `t` clamped to [0, 1].
/// Degenerate pairs snap to the target instead of panicking.
pub fn slerp_toward(
    from: &UnitQuaternion<f64>,
    to: &UnitQuaternion<f64>,
    t: f64,
) -> UnitQuaternion<f64> {
    from.try_slerp(to, t.clamp(0.0, 1.0), 1e-9).unwrap_or(*to)
}

/// Yaw (deg) of the body forward axis about world up.
pub fn yaw_deg(quat: &UnitQuaternion<f64>) -> f64 {
    let f = quat * Vector3::z();
    f.x.atan2(f.z).to_degrees()
}

/// The same heading with pitch and bank removed.
pub fn level(quat: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_deg(quat).to_radians())
}

/// Intermediate values of one blend, handy for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    pub pitch_deg: f64,
    pub bank_deg: f64,
    pub heading_error_deg: f64,
    pub target: UnitQuaternion<f64>,
}

/// Target cruise attitude.
///
/// * pitch = lerp(0, 20 deg, speed / forward_speed), nose down to accelerate
/// * bank  = clamp(-0.5 * heading error, -30, 30) deg
/// * result = look-at(direction) * Rx(pitch) * Rz(bank)
///
/// `direction` must be horizontal and non-zero.
pub fn blend(
    current: &UnitQuaternion<f64>,
    direction: &Vector3<f64>,
    speed: f64,
    forward_speed: f64,
) -> Blend {
    let up = Vector3::y();
    let normalized_speed = speed / forward_speed;
    let pitch_deg = lerp(0.0, MAX_FORWARD_TILT_DEG, normalized_speed);

    let forward = current * Vector3::z();
    let heading_error_deg = signed_angle_deg(&forward, direction, &up);
    let bank_deg = (heading_error_deg * BANK_GAIN).clamp(-MAX_BANK_DEG, MAX_BANK_DEG);

    let heading = UnitQuaternion::face_towards(direction, &up);
    let tilt = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch_deg.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), bank_deg.to_radians());

    Blend {
        pitch_deg,
        bank_deg,
        heading_error_deg,
        target: heading * tilt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn lerp_clamps() {
        assert_eq!(lerp(0.0, 20.0, 2.0), 20.0);
        assert_eq!(lerp(0.0, 20.0, -1.0), 0.0);
        assert!((lerp(1.0, 1.5, 0.5) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn signed_angle_sign_follows_axis() {
        let up = Vector3::y();
        let a = signed_angle_deg(&Vector3::z(), &Vector3::x(), &up);
        let b = signed_angle_deg(&Vector3::x(), &Vector3::z(), &up);
        assert!((a - 90.0).abs() < 1e-9);
        assert!((b + 90.0).abs() < 1e-9);
        let behind = signed_angle_deg(&Vector3::z(), &-Vector3::z(), &up);
        assert!((behind - 180.0).abs() < 1e-9);
    }

    #[test]
    fn level_keeps_heading_only() {
        let tilted = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -0.2);
        let l = level(&tilted);
        let f = l * Vector3::z();
        let u = l * Vector3::y();
        assert!((f - Vector3::x()).norm() < 1e-9);
        assert!((u - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn blend_at_rest_faces_target_level() {
        let b = blend(&UnitQuaternion::identity(), &Vector3::x(), 0.0, 50.0);
        assert_eq!(b.pitch_deg, 0.0);
        assert!((b.heading_error_deg - 90.0).abs() < 1e-9);
        assert_eq!(b.bank_deg, -MAX_BANK_DEG);
        let f = b.target * Vector3::z();
        assert!((f - Vector3::x()).norm() < 1e-9, "bank must not move the nose");
    }

    #[test]
    fn blend_pitch_saturates_at_cruise() {
        let b = blend(&UnitQuaternion::identity(), &Vector3::z(), 80.0, 50.0);
        assert_eq!(b.pitch_deg, MAX_FORWARD_TILT_DEG);
        let f = b.target * Vector3::z();
        assert!(f.y < 0.0, "accelerating pitches the nose down");
    }

    #[test]
    fn slerp_is_exponential_approach() {
        let a = UnitQuaternion::identity();
        let b = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.0);
        let mut q = a;
        for _ in 0..3 {
            q = slerp_toward(&q, &b, 0.5);
        }
        assert!((q.angle_to(&b) - 0.125).abs() < 1e-9);
        assert!(slerp_toward(&a, &b, 5.0).angle_to(&b) < 1e-9);
    }
}
