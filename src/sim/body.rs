use nalgebra::{UnitQuaternion, Vector3};

use crate::dynamics::state::{ControlOutput, KinematicState, GRAVITY};

// ---------------------------------------------------------------------------
// Reference rigid body: semi-implicit Euler with gravity and a ground plane
// ---------------------------------------------------------------------------

/// Advance a state by one step under a constant acceleration.
/// Velocity first, then position with the new velocity; attitude follows
/// the world-frame angular rate.
pub fn euler_step(state: &KinematicState, accel: &Vector3<f64>, dt: f64) -> KinematicState {
    let vel = state.vel + accel * dt;
    KinematicState {
        pos: state.pos + vel * dt,
        vel,
        quat: UnitQuaternion::from_scaled_axis(state.omega * dt) * state.quat,
        omega: state.omega,
    }
}

/// Minimal stand-in for a physics engine body. Takes the controller's
/// overrides as authoritative, adds gravity to the commanded acceleration and
/// stops at the y = 0 ground plane.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub state: KinematicState,
    pub gravity: Vector3<f64>,
}

impl RigidBody {
    pub fn new(state: KinematicState) -> Self {
        Self { state, gravity: Vector3::new(0.0, -GRAVITY, 0.0) }
    }

    /// Body with gravity switched off, for isolating a control law.
    pub fn weightless(state: KinematicState) -> Self {
        Self { state, gravity: Vector3::zeros() }
    }

    pub fn apply_overrides(&mut self, out: &ControlOutput) {
        out.apply_overrides(&mut self.state);
    }

    pub fn integrate(&mut self, accel: &Vector3<f64>, dt: f64) {
        let total = accel + self.gravity;
        self.state = euler_step(&self.state, &total, dt);

        // Ground contact: no sinking, no sliding.
        if self.state.pos.y < 0.0 {
            self.state.pos.y = 0.0;
            self.state.vel = Vector3::new(0.0, self.state.vel.y.max(0.0), 0.0);
        }
    }

    /// Overrides, then integration.
    pub fn step(&mut self, out: &ControlOutput, dt: f64) {
        self.apply_overrides(out);
        self.integrate(&out.accel, dt);
    }
}
