use nalgebra::Vector3;

use crate::vehicle::VehicleConfig;

// ---------------------------------------------------------------------------
// Per-phase force laws (acceleration mode, mass independent)
// ---------------------------------------------------------------------------

pub const MAX_CLIMB_RATE: f64 = 5.0;          // m/s
pub const HOVER_HEIGHT_GAIN: f64 = 10.0;
pub const HORIZONTAL_DAMPING: f64 = 2.0;      // 1/s
pub const CRUISE_RAMP_DISTANCE: f64 = 10.0;   // m
pub const TURN_DRAG: f64 = 0.5;
pub const DESCENT_SCALE: f64 = 10.0;          // m
pub const MAX_DESCENT_RATE: f64 = 2.0;        // m/s
pub const TOUCHDOWN_HEIGHT: f64 = 0.1;        // m
pub const HOVER_ENTRY_FRACTION: f64 = 0.95;

fn horizontal(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, 0.0, v.z)
}

/// Takeoff lift: `clamp((max_height - h) * lift_speed, 0, lift_speed)` up.
pub fn climb(height: f64, cfg: &VehicleConfig) -> Vector3<f64> {
    let up = ((cfg.max_height - height) * cfg.lift_speed).clamp(0.0, cfg.lift_speed);
    Vector3::y() * up
}

/// Vertical velocity limited to the maximum climb rate.
pub fn cap_climb_rate(vel: &Vector3<f64>) -> Option<Vector3<f64>> {
    (vel.y > MAX_CLIMB_RATE).then(|| Vector3::new(vel.x, MAX_CLIMB_RATE, vel.z))
}

/// Hover hold: `hover_force + height_error * 10` up, plus horizontal
/// velocity damping of `-2 * v_h`.
pub fn hover(vel: &Vector3<f64>, height_error: f64, cfg: &VehicleConfig) -> Vector3<f64> {
    let lift = cfg.hover_force + height_error * HOVER_HEIGHT_GAIN;
    Vector3::y() * lift - horizontal(vel) * HORIZONTAL_DAMPING
}

/// Cruise propulsion along the body forward axis, ramped in over the last
/// ten metres to the target.
pub fn cruise(forward: &Vector3<f64>, distance: f64, cfg: &VehicleConfig) -> Vector3<f64> {
    let ramp = (distance / CRUISE_RAMP_DISTANCE).clamp(0.0, 1.0);
    forward * cfg.forward_speed * ramp
}

/// Horizontal speed rescaled to at most `forward_speed`, vertical untouched.
pub fn cap_horizontal_speed(vel: &Vector3<f64>, cfg: &VehicleConfig) -> Option<Vector3<f64>> {
    let h = horizontal(vel);
    let speed = h.norm();
    if speed > cfg.forward_speed {
        let h = h * (cfg.forward_speed / speed);
        Some(Vector3::new(h.x, vel.y, h.z))
    } else {
        None
    }
}

/// Velocity multiplier while turning: `1 - 0.5 * |err| / 180`.
pub fn turn_drag_factor(heading_error_deg: f64) -> f64 {
    1.0 - (heading_error_deg.abs() / 180.0) * TURN_DRAG
}

/// Landing descent: pull down proportional to height, push back up when
/// sinking faster than 2 m/s, damp horizontal drift.
pub fn descend(height: f64, vel: &Vector3<f64>, cfg: &VehicleConfig) -> Vector3<f64> {
    let mut accel = Vector3::y() * (-cfg.lift_speed * (height / DESCENT_SCALE));
    if vel.y < -MAX_DESCENT_RATE {
        accel += Vector3::y() * (-vel.y * cfg.lift_speed);
    }
    accel - horizontal(vel) * HORIZONTAL_DAMPING
}
