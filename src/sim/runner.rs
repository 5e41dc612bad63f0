use nalgebra::Vector3;
use tracing::{debug, info};

use crate::control::{AutoPilotSupervisor, FlightState, FlightStateMachine, PhaseListener};
use crate::dynamics::state::{ControlOutput, KinematicState, SimConfig};
use crate::feedback::{AudioFeedbackMapper, Rotor, RotorAnimator};
use crate::vehicle::{Permissions, VehicleConfig, WaypointSet};
use super::body::RigidBody;
use super::event::{EventDetector, SimEvent, TransitionDetector, WaypointDetector};

// ---------------------------------------------------------------------------
// Helicopter: controller + feedback + reference body wired together
// ---------------------------------------------------------------------------

/// One recorded step of a flight.
#[derive(Debug, Clone)]
pub struct Sample {
    pub time: f64,
    pub state: KinematicState,
    pub flight: FlightState,
    pub waypoint: usize,
    pub rotor_spin: f64,
    pub volume: f64,
    pub pitch: f64,
}

pub struct Helicopter {
    pub machine: FlightStateMachine,
    pub supervisor: AutoPilotSupervisor,
    pub rotors: RotorAnimator,
    pub audio: AudioFeedbackMapper,
    pub body: RigidBody,
    time: f64,
}

impl Helicopter {
    /// Parked at the first waypoint (or the origin when there is none).
    pub fn new(config: VehicleConfig, waypoints: WaypointSet) -> Self {
        let start = waypoints.first().unwrap_or_else(Vector3::zeros);
        let rotors = RotorAnimator::new(
            Some(Rotor::main(config.main_rotor_speed)),
            Some(Rotor::tail(config.tail_rotor_speed)),
        );
        let audio = AudioFeedbackMapper::new(
            config.max_engine_volume,
            config.lift_speed,
            config.forward_speed,
        );
        Self {
            machine: FlightStateMachine::new(config, waypoints),
            supervisor: AutoPilotSupervisor::new(),
            rotors,
            audio,
            body: RigidBody::new(KinematicState::at_rest(start)),
            time: 0.0,
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn PhaseListener>) -> Self {
        self.machine = self.machine.with_listener(listener);
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.machine.permissions = permissions;
        self
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> FlightState {
        self.machine.state()
    }

    pub fn request_take_off(&mut self) {
        self.machine.request_take_off();
    }

    pub fn request_landing(&mut self) {
        self.machine.request_landing();
    }

    pub fn request_movement(&mut self) {
        self.machine.request_movement();
    }

    pub fn set_automatic_mode(&mut self, automatic: bool) {
        self.supervisor.set_automatic_mode(automatic);
    }

    /// Back to the first waypoint, grounded, motionless, rotors stopped.
    /// No-op without waypoints.
    pub fn reset_to_start(&mut self) {
        if let Some(o) = self.machine.reset_to_start() {
            o.apply(&mut self.body.state);
            self.rotors.reset();
        }
    }

    /// Supervisor, control law and overrides for one tick. The body holds the
    /// corrected state afterwards but has not been integrated yet.
    pub fn command(&mut self, dt: f64) -> ControlOutput {
        if let Some(to) = self.supervisor.update(dt, &mut self.machine, &self.body.state) {
            debug!(time = self.time, %to, "supervisor transition");
        }
        let out = self.machine.tick(dt, &self.body.state);
        self.body.apply_overrides(&out);

        let state = self.machine.state();
        let vel = self.body.state.vel;
        self.rotors.update(dt, state);
        self.audio.update(dt, state, vel.y, vel.norm());
        out
    }

    /// Integrate the commanded acceleration and advance the clock.
    pub fn integrate(&mut self, out: &ControlOutput, dt: f64) {
        self.body.integrate(&out.accel, dt);
        self.time += dt;
    }

    pub fn step(&mut self, dt: f64) -> Sample {
        let out = self.command(dt);
        self.integrate(&out, dt);
        self.sample()
    }

    pub fn sample(&self) -> Sample {
        Sample {
            time: self.time,
            state: self.body.state.clone(),
            flight: self.machine.state(),
            waypoint: self.machine.current_waypoint(),
            rotor_spin: self.rotors.spin(),
            volume: self.audio.volume(),
            pitch: self.audio.pitch(),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed-step runner
// ---------------------------------------------------------------------------

/// Fly until touchdown after a landing, or until `max_time`, running extra
/// event detectors alongside the built-in transition and waypoint ones.
/// Returns the sampled trajectory and the detected timeline events.
pub fn simulate_with(
    heli: &mut Helicopter,
    config: &SimConfig,
    extra: Vec<Box<dyn EventDetector>>,
) -> (Vec<Sample>, Vec<SimEvent>) {
    let capacity = ((config.max_time / config.dt) as usize + 1).min(200_000);
    let mut trajectory = Vec::with_capacity(capacity);
    let mut events = Vec::new();
    let mut detectors: Vec<Box<dyn EventDetector>> =
        vec![Box::new(TransitionDetector), Box::new(WaypointDetector)];
    detectors.extend(extra);

    let mut prev = heli.sample();
    trajectory.push(prev.clone());

    while heli.time() < config.max_time {
        let current = heli.step(config.dt);

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &current) {
                events.push(SimEvent { time: current.time, kind, sample: current.clone() });
            }
        }

        let touched_down =
            prev.flight == FlightState::Landing && current.flight == FlightState::Grounded;
        trajectory.push(current.clone());
        prev = current;

        if touched_down {
            info!(time = prev.time, "sortie complete");
            break;
        }
    }

    (trajectory, events)
}

/// Simulate with the built-in detectors only.
pub fn simulate(heli: &mut Helicopter, config: &SimConfig) -> (Vec<Sample>, Vec<SimEvent>) {
    simulate_with(heli, config, Vec::new())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::PhaseEvent;
    use crate::sim::event::{EventKind, EventLog};
    use crate::vehicle::{Traversal, VehicleConfigBuilder};
    use nalgebra::UnitQuaternion;

    const DT: f64 = 0.02;

    fn horizontal_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        Vector3::new(a.x - b.x, 0.0, a.z - b.z).norm()
    }

    /// Hovering at the ceiling, facing +X, automatic mode off.
    fn hovering(points: Vec<Vector3<f64>>, log: &EventLog) -> Helicopter {
        let mut heli = Helicopter::new(VehicleConfig::default(), WaypointSet::new(points))
            .with_listener(Box::new(log.clone()))
            .with_permissions(Permissions { can_take_off: true, can_land: false });
        heli.set_automatic_mode(false);
        heli.body.state = KinematicState::at_rest(Vector3::new(0.0, 80.0, 0.0));
        heli.body.state.quat = UnitQuaternion::face_towards(&Vector3::x(), &Vector3::y());
        heli.request_take_off();
        heli.step(DT);
        assert_eq!(heli.state(), FlightState::Hovering);
        heli
    }

    #[test]
    fn climb_to_ceiling_never_exceeds_it() {
        let log = EventLog::new();
        let mut heli = Helicopter::new(VehicleConfig::default(), WaypointSet::default())
            .with_listener(Box::new(log.clone()))
            .with_permissions(Permissions { can_take_off: true, can_land: false });
        heli.set_automatic_mode(false);
        heli.request_take_off();

        let mut prev_height = 0.0;
        for _ in 0..3000 {
            let was = heli.state();
            let out = heli.command(DT);
            let h = heli.body.state.pos.y;
            assert!(h <= 80.0, "height {h} above ceiling after tick");

            if was == FlightState::TakingOff && heli.state() == FlightState::Hovering {
                assert!(h >= 76.0 && prev_height < 76.0, "hover entered at {h}");
            }
            if heli.state() == FlightState::TakingOff {
                assert!(h < 76.0);
            }
            prev_height = h;
            heli.integrate(&out, DT);
        }

        assert_eq!(heli.state(), FlightState::Hovering);
        assert!(prev_height > 79.5, "settled at {prev_height}");
        assert_eq!(log.events(), vec![PhaseEvent::TakeOff, PhaseEvent::Hover]);
    }

    #[test]
    fn cruise_closes_on_single_waypoint() {
        let log = EventLog::new();
        let target = Vector3::new(100.0, 0.0, 0.0);
        let mut heli = hovering(vec![target], &log);
        heli.request_movement();

        let mut prev = horizontal_distance(&heli.body.state.pos, &target);
        let mut arrived = false;
        for _ in 0..3000 {
            let s = heli.step(DT);
            assert_eq!(s.flight, FlightState::Moving);
            let d = horizontal_distance(&s.state.pos, &target);
            if d <= 5.0 {
                arrived = true;
                break;
            }
            assert!(d <= prev + 1e-9, "distance grew from {prev} to {d}");
            prev = d;
        }
        assert!(arrived, "never reached the waypoint, last distance {prev}");
        assert_eq!(heli.machine.current_waypoint(), 0);
    }

    #[test]
    fn cruise_speed_is_capped() {
        let log = EventLog::new();
        let mut heli = hovering(vec![Vector3::new(5000.0, 0.0, 0.0)], &log);
        heli.request_movement();
        heli.body.state.vel = Vector3::new(90.0, 0.0, 0.0);
        heli.command(DT);
        assert!(heli.body.state.horizontal_vel().norm() <= 50.0 + 1e-9);
    }

    #[test]
    fn landing_descends_monotonically_and_snaps() {
        for start in [80.0, 35.0, 3.0] {
            let log = EventLog::new();
            let mut heli = hovering(vec![], &log);
            heli.machine.permissions.can_land = true;
            heli.body.state.pos.y = start;
            heli.request_landing();
            assert_eq!(heli.state(), FlightState::Landing);

            let mut prev = heli.body.state.pos.y;
            let mut steps = 0;
            while heli.state() == FlightState::Landing {
                let s = heli.step(DT);
                if s.flight == FlightState::Landing {
                    assert!(s.state.pos.y < prev, "climbed from {prev} to {}", s.state.pos.y);
                }
                prev = s.state.pos.y;
                steps += 1;
                assert!(steps < 20_000, "landing from {start} never finished");
            }

            let s = heli.body.state.clone();
            assert_eq!(heli.state(), FlightState::Grounded);
            assert_eq!(s.pos.y, 0.0);
            assert_eq!(s.vel, Vector3::zeros());
            assert_eq!(s.omega, Vector3::zeros());
            assert_eq!(log.count(PhaseEvent::Landing), 1);
        }
    }

    #[test]
    fn reset_returns_to_first_waypoint() {
        let log = EventLog::new();
        let mut heli = hovering(vec![Vector3::new(10.0, 0.0, -4.0), Vector3::new(60.0, 0.0, 0.0)], &log);
        heli.request_movement();
        for _ in 0..50 {
            heli.step(DT);
        }
        assert!(heli.rotors.spin() > 0.0);
        heli.reset_to_start();
        assert_eq!(heli.state(), FlightState::Grounded);
        assert_eq!(heli.machine.current_waypoint(), 0);
        assert_eq!(heli.body.state.pos, Vector3::new(10.0, 0.0, -4.0));
        assert_eq!(heli.body.state.vel, Vector3::zeros());
        assert_eq!(heli.rotors.spin(), 0.0);
    }

    #[test]
    fn reset_without_waypoints_changes_nothing() {
        let log = EventLog::new();
        let mut heli = hovering(vec![], &log);
        let before = heli.body.state.clone();
        heli.reset_to_start();
        assert_eq!(heli.state(), FlightState::Hovering);
        assert_eq!(heli.body.state, before);
    }

    #[test]
    fn automatic_sortie_flies_route_and_lands() {
        let log = EventLog::new();
        let route = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(150.0, 0.0, 0.0),
            Vector3::new(150.0, 0.0, 150.0),
        ];
        let mut heli = Helicopter::new(VehicleConfig::default(), WaypointSet::new(route))
            .with_listener(Box::new(log.clone()))
            .with_permissions(Permissions::all());

        let config = SimConfig { dt: DT, max_time: 300.0 };
        let (traj, events) = simulate(&mut heli, &config);

        assert_eq!(
            log.events(),
            vec![PhaseEvent::TakeOff, PhaseEvent::Hover, PhaseEvent::Moving, PhaseEvent::Landing]
        );
        let last = traj.last().unwrap();
        assert_eq!(last.flight, FlightState::Grounded);
        assert!(last.time < config.max_time);
        assert!(horizontal_distance(&last.state.pos, &Vector3::new(150.0, 0.0, 150.0)) < 15.0);

        let reached: Vec<usize> = events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::WaypointReached { index } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(reached, vec![0, 1, 2]);
        assert!(traj.iter().all(|s| s.volume <= 1.0 && s.rotor_spin <= 1.0));
    }

    #[test]
    fn random_patrol_keeps_cursor_in_range() {
        let cfg = VehicleConfigBuilder::new()
            .traversal(Traversal::Random)
            .rng_seed(99)
            .build();
        let route: Vec<_> = (0..4)
            .map(|i| Vector3::new(60.0 * i as f64, 0.0, 40.0 * (i % 2) as f64))
            .collect();
        let mut heli = Helicopter::new(cfg, WaypointSet::new(route))
            .with_permissions(Permissions { can_take_off: true, can_land: false });
        let config = SimConfig { dt: DT, max_time: 90.0 };
        let (traj, _) = simulate(&mut heli, &config);
        assert!(traj.iter().all(|s| s.waypoint < 4));
        assert!(traj.iter().any(|s| s.flight == FlightState::Moving));
    }
}
