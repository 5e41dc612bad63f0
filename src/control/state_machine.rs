use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dynamics::state::{ControlOutput, KinematicOverride, KinematicState};
use crate::vehicle::{NavigationCursor, Permissions, VehicleConfig, WaypointSet};
use super::attitude;
use super::events::{NullListener, PhaseEvent, PhaseListener};
use super::laws;

// ---------------------------------------------------------------------------
// Flight states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightState {
    #[default]
    Grounded,
    TakingOff,
    Hovering,
    Moving,
    Landing,
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightState::Grounded => "GROUND",
            FlightState::TakingOff => "TAKEOFF",
            FlightState::Hovering => "HOVER",
            FlightState::Moving => "CRUISE",
            FlightState::Landing => "LAND",
        };
        f.pad(s)
    }
}

// ---------------------------------------------------------------------------
// Actuation buffer: working view of the body + what we send back
// ---------------------------------------------------------------------------

/// Later laws in the same tick must see earlier overrides (e.g. the hover
/// damping reads the velocity the cruise cap just rescaled), so every write
/// lands both in the working state and in the outgoing command.
struct Actuation {
    state: KinematicState,
    out: ControlOutput,
}

impl Actuation {
    fn new(snapshot: &KinematicState) -> Self {
        Self { state: snapshot.clone(), out: ControlOutput::default() }
    }

    fn add_accel(&mut self, a: Vector3<f64>) {
        self.out.accel += a;
    }

    fn set_position(&mut self, p: Vector3<f64>) {
        self.state.pos = p;
        self.out.overrides.position = Some(p);
    }

    fn set_velocity(&mut self, v: Vector3<f64>) {
        self.state.vel = v;
        self.out.overrides.velocity = Some(v);
    }

    fn set_orientation(&mut self, q: UnitQuaternion<f64>) {
        self.state.quat = q;
        self.out.overrides.orientation = Some(q);
    }

    fn set_angular_velocity(&mut self, w: Vector3<f64>) {
        self.state.omega = w;
        self.out.overrides.angular_velocity = Some(w);
    }
}

// ---------------------------------------------------------------------------
// Flight state machine
// ---------------------------------------------------------------------------

/// Owns the flight state and runs the active control law once per physics
/// tick. State only changes through the `request_*` entry points, the
/// takeoff completion check, the landing touchdown and `reset_to_start`.
pub struct FlightStateMachine {
    config: VehicleConfig,
    /// Operator permissions; may be flipped at any time.
    pub permissions: Permissions,
    waypoints: WaypointSet,
    cursor: NavigationCursor,
    state: FlightState,
    hover_target: Option<f64>,
    rng: StdRng,
    listener: Box<dyn PhaseListener>,
}

impl FlightStateMachine {
    pub fn new(config: VehicleConfig, waypoints: WaypointSet) -> Self {
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        Self {
            config,
            permissions: Permissions::default(),
            waypoints,
            cursor: NavigationCursor::default(),
            state: FlightState::Grounded,
            hover_target: None,
            rng: StdRng::seed_from_u64(seed),
            listener: Box::new(NullListener),
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn PhaseListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    /// Replace the route. The cursor restarts at the first waypoint.
    pub fn set_waypoints(&mut self, waypoints: WaypointSet) {
        self.waypoints = waypoints;
        self.cursor.reset();
    }

    pub fn current_waypoint(&self) -> usize {
        self.cursor.index()
    }

    /// Position of the waypoint the cursor points at.
    pub fn current_target(&self) -> Option<Vector3<f64>> {
        self.waypoints.get(self.cursor.index())
    }

    /// Height the hover law is holding, when hover hold is enabled.
    pub fn hover_target(&self) -> Option<f64> {
        self.hover_target
    }

    fn emit(&mut self, event: PhaseEvent) {
        self.listener.on_event(event);
    }

    // --- Guarded transitions -------------------------------------------------

    /// Grounded → TakingOff when takeoff is permitted. Silent no-op otherwise.
    pub fn request_take_off(&mut self) {
        if self.state == FlightState::Grounded && self.permissions.can_take_off {
            self.state = FlightState::TakingOff;
            info!("takeoff started");
            self.emit(PhaseEvent::TakeOff);
        }
    }

    /// Any airborne state → Landing when landing is permitted.
    pub fn request_landing(&mut self) {
        if self.state != FlightState::Grounded && self.permissions.can_land {
            self.state = FlightState::Landing;
            info!(waypoint = self.cursor.index(), "landing started");
            self.emit(PhaseEvent::Landing);
        }
    }

    /// Hovering → Moving.
    pub fn request_movement(&mut self) {
        if self.state == FlightState::Hovering {
            self.state = FlightState::Moving;
            info!(waypoint = self.cursor.index(), "cruise started");
            self.emit(PhaseEvent::Moving);
        }
    }

    fn enter_hover(&mut self, height: f64) {
        self.state = FlightState::Hovering;
        self.hover_target = self.config.hover_hold.then_some(height);
        info!(height, "hover entered");
        self.emit(PhaseEvent::Hover);
    }

    /// Teleport back to the first waypoint on the ground with all motion
    /// zeroed. Returns the override to apply, or `None` (and changes
    /// nothing) when there are no waypoints.
    pub fn reset_to_start(&mut self) -> Option<KinematicOverride> {
        let start = self.waypoints.first()?;
        self.cursor.reset();
        self.state = FlightState::Grounded;
        self.hover_target = None;
        info!(x = start.x, y = start.y, z = start.z, "reset to start");
        Some(KinematicOverride {
            position: Some(start),
            velocity: Some(Vector3::zeros()),
            orientation: None,
            angular_velocity: Some(Vector3::zeros()),
        })
    }

    // --- Physics tick ----------------------------------------------------------

    /// Run one physics step: height clamp, then the active state's law.
    pub fn tick(&mut self, dt: f64, snapshot: &KinematicState) -> ControlOutput {
        let mut act = Actuation::new(snapshot);
        self.clamp_height(&mut act);

        match self.state {
            FlightState::Grounded => {}
            FlightState::TakingOff => self.take_off(&mut act),
            FlightState::Hovering => self.hover(&mut act),
            FlightState::Moving => self.cruise(dt, &mut act),
            FlightState::Landing => self.land(dt, &mut act),
        }

        act.out
    }

    fn clamp_height(&self, act: &mut Actuation) {
        let max = self.config.max_height;
        if act.state.pos.y > max {
            let p = act.state.pos;
            let v = act.state.vel;
            act.set_position(Vector3::new(p.x, max, p.z));
            act.set_velocity(Vector3::new(v.x, v.y.min(0.0), v.z));
        }
    }

    fn take_off(&mut self, act: &mut Actuation) {
        let height = act.state.height();
        act.add_accel(laws::climb(height, &self.config));
        if let Some(v) = laws::cap_climb_rate(&act.state.vel) {
            act.set_velocity(v);
        }
        if height >= self.config.max_height * laws::HOVER_ENTRY_FRACTION {
            self.enter_hover(height);
        }
    }

    fn hover(&self, act: &mut Actuation) {
        // Without hover hold the error term is identically zero and
        // hover_force alone sustains the vehicle.
        let height_error = self
            .hover_target
            .map_or(0.0, |target| target - act.state.height());
        act.add_accel(laws::hover(&act.state.vel, height_error, &self.config));
    }

    fn cruise(&mut self, dt: f64, act: &mut Actuation) {
        let Some(mut target) = self.current_target() else {
            return;
        };
        target.y = self.config.max_height;

        let to_target = target - act.state.pos;
        let horizontal = Vector3::new(to_target.x, 0.0, to_target.z);
        let distance = horizontal.norm();

        if distance > self.config.waypoint_radius.max(0.0) {
            let blend = attitude::blend(
                &act.state.quat,
                &(horizontal / distance),
                act.state.speed(),
                self.config.forward_speed,
            );
            let q = attitude::slerp_toward(&act.state.quat, &blend.target, self.config.turn_speed * dt);
            act.set_orientation(q);

            let forward = q * Vector3::z();
            act.add_accel(laws::cruise(&forward, distance, &self.config));

            if let Some(v) = laws::cap_horizontal_speed(&act.state.vel, &self.config) {
                act.set_velocity(v);
            }

            let drag = laws::turn_drag_factor(blend.heading_error_deg);
            if drag < 1.0 {
                act.set_velocity(act.state.vel * drag);
            }

            self.hover(act);
        } else {
            let q = attitude::slerp_toward(
                &act.state.quat,
                &attitude::level(&act.state.quat),
                self.config.turn_speed * dt,
            );
            act.set_orientation(q);
            self.arrive(distance);
        }
    }

    fn arrive(&mut self, distance: f64) {
        let reached = self.cursor.index();
        let Some(next) = self.cursor.advance(self.waypoints.len(), self.config.traversal, &mut self.rng)
        else {
            return;
        };
        debug!(reached, next, distance, "waypoint reached");
        if next == 0 && self.permissions.can_land {
            self.request_landing();
        }
    }

    fn land(&mut self, dt: f64, act: &mut Actuation) {
        let q = attitude::slerp_toward(
            &act.state.quat,
            &attitude::level(&act.state.quat),
            self.config.turn_speed * dt,
        );
        act.set_orientation(q);

        let height = act.state.height();
        if height > laws::TOUCHDOWN_HEIGHT {
            act.add_accel(laws::descend(height, &act.state.vel, &self.config));
        } else {
            let p = act.state.pos;
            act.set_velocity(Vector3::zeros());
            act.set_angular_velocity(Vector3::zeros());
            act.set_position(Vector3::new(p.x, 0.0, p.z));
            self.state = FlightState::Grounded;
            info!(x = p.x, z = p.z, "touchdown");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
