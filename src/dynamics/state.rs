use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const GRAVITY: f64 = 9.81; // m/s^2, applied along -Y by the reference body

// ---------------------------------------------------------------------------
// Kinematic state: position, velocity, attitude, angular rate
// ---------------------------------------------------------------------------

/// Per-tick snapshot of the vehicle body.
/// Frame: Y up, body forward = +Z, body lateral = +X.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    pub pos: Vector3<f64>,          // m, world frame
    pub vel: Vector3<f64>,          // m/s, world frame
    pub quat: UnitQuaternion<f64>,  // body→world rotation
    pub omega: Vector3<f64>,        // rad/s
}

impl KinematicState {
    /// At rest at `pos`, level, facing +Z.
    pub fn at_rest(pos: Vector3<f64>) -> Self {
        Self {
            pos,
            vel: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
        }
    }

    pub fn height(&self) -> f64 {
        self.pos.y
    }

    /// Body forward axis (+Z) in the world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.quat * Vector3::z()
    }

    /// Velocity with the vertical component removed.
    pub fn horizontal_vel(&self) -> Vector3<f64> {
        Vector3::new(self.vel.x, 0.0, self.vel.z)
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros())
    }
}

// ---------------------------------------------------------------------------
// Controller output: force accumulation + authoritative overrides
// ---------------------------------------------------------------------------

/// Direct writes to the body that bypass integration.
/// Only the height clamp, attitude commands, velocity caps and the
/// landing snap go through this channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinematicOverride {
    pub position: Option<Vector3<f64>>,
    pub velocity: Option<Vector3<f64>>,
    pub orientation: Option<UnitQuaternion<f64>>,
    pub angular_velocity: Option<Vector3<f64>>,
}

impl KinematicOverride {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.velocity.is_none()
            && self.orientation.is_none()
            && self.angular_velocity.is_none()
    }

    pub fn apply(&self, state: &mut KinematicState) {
        if let Some(p) = self.position {
            state.pos = p;
        }
        if let Some(v) = self.velocity {
            state.vel = v;
        }
        if let Some(q) = self.orientation {
            state.quat = q;
        }
        if let Some(w) = self.angular_velocity {
            state.omega = w;
        }
    }
}

/// Everything the controller hands to the physics collaborator for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlOutput {
    pub accel: Vector3<f64>,  // summed acceleration-mode force, m/s^2
    pub overrides: KinematicOverride,
}

impl ControlOutput {
    pub fn apply_overrides(&self, state: &mut KinematicState) {
        self.overrides.apply(state);
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,         // 50 Hz physics tick
            max_time: 120.0,
        }
    }
}
