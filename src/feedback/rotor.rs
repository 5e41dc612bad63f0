use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::control::FlightState;

// ---------------------------------------------------------------------------
// Rotor spin-up animation
// ---------------------------------------------------------------------------

pub const SPIN_RATE: f64 = 2.0; // 1/s, first-order lag toward the target spin

/// One rotor hub: spins about a fixed local axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotor {
    pub axis: Unit<Vector3<f64>>,
    pub speed: f64,  // deg/s at full spin
    pub angle: f64,  // deg, accumulated, wrapped to [0, 360)
}

impl Rotor {
    pub fn new(axis: Unit<Vector3<f64>>, speed: f64) -> Self {
        Self { axis, speed, angle: 0.0 }
    }

    /// Main rotor: spins about the vertical body axis.
    pub fn main(speed: f64) -> Self {
        Self::new(Vector3::y_axis(), speed)
    }

    /// Tail rotor: spins about the lateral body axis.
    pub fn tail(speed: f64) -> Self {
        Self::new(Vector3::x_axis(), speed)
    }

    fn turn(&mut self, spin: f64, dt: f64) -> f64 {
        let delta = self.speed * spin * dt;
        self.angle = (self.angle + delta).rem_euclid(360.0);
        delta
    }

    /// Local rotation of the hub.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.axis, self.angle.to_radians())
    }
}

/// Angular displacement (deg) produced by one update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotorDelta {
    pub main: f64,
    pub tail: f64,
}

/// Maps the discrete flight state to a smoothed spin scalar in [0, 1]
/// and turns the rotor hubs accordingly. Purely cosmetic.
#[derive(Debug, Clone)]
pub struct RotorAnimator {
    spin: f64,
    pub main: Option<Rotor>,
    pub tail: Option<Rotor>,
}

impl RotorAnimator {
    pub fn new(main: Option<Rotor>, tail: Option<Rotor>) -> Self {
        Self { spin: 0.0, main, tail }
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn reset(&mut self) {
        self.spin = 0.0;
    }

    pub fn update(&mut self, dt: f64, state: FlightState) -> RotorDelta {
        let target = if state == FlightState::Grounded { 0.0 } else { 1.0 };
        self.spin += (target - self.spin) * (SPIN_RATE * dt).clamp(0.0, 1.0);

        let spin = self.spin;
        RotorDelta {
            main: self.main.as_mut().map_or(0.0, |r| r.turn(spin, dt)),
            tail: self.tail.as_mut().map_or(0.0, |r| r.turn(spin, dt)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> RotorAnimator {
        RotorAnimator::new(Some(Rotor::main(500.0)), Some(Rotor::tail(700.0)))
    }

    #[test]
    fn spin_lags_toward_one_when_airborne() {
        let mut a = animator();
        let d = a.update(0.02, FlightState::TakingOff);
        assert!((a.spin() - 0.04).abs() < 1e-12);
        assert!((d.main - 500.0 * 0.04 * 0.02).abs() < 1e-12);
        assert!((d.tail - 700.0 * 0.04 * 0.02).abs() < 1e-12);

        let mut prev = a.spin();
        for _ in 0..500 {
            a.update(0.02, FlightState::Moving);
            assert!(a.spin() >= prev && a.spin() <= 1.0);
            prev = a.spin();
        }
        assert!(a.spin() > 0.999);
    }

    #[test]
    fn spin_decays_when_grounded() {
        let mut a = animator();
        for _ in 0..200 {
            a.update(0.02, FlightState::Hovering);
        }
        let high = a.spin();
        a.update(0.02, FlightState::Grounded);
        assert!(a.spin() < high);
    }

    #[test]
    fn missing_rotor_is_tolerated() {
        let mut a = RotorAnimator::new(None, Some(Rotor::tail(700.0)));
        let d = a.update(0.5, FlightState::Hovering);
        assert_eq!(d.main, 0.0);
        assert!(d.tail > 0.0);
        assert!(a.main.is_none());
    }

    #[test]
    fn angle_wraps() {
        let mut r = Rotor::main(500.0);
        r.turn(1.0, 1.0);
        assert!((r.angle - 140.0).abs() < 1e-9);
    }
}
