use tracing::trace;

use crate::dynamics::state::KinematicState;
use super::laws::HOVER_ENTRY_FRACTION;
use super::state_machine::{FlightState, FlightStateMachine};

// ---------------------------------------------------------------------------
// Automatic-mode supervisor (low-rate decision loop)
// ---------------------------------------------------------------------------

pub const SUPERVISOR_PERIOD: f64 = 0.5; // s of simulated time

/// Periodically nudges the state machine through a full sortie when
/// automatic mode is on. Decisions run on an elapsed-time accumulator, so the
/// cadence is independent of the physics tick rate. The first call to
/// `update` always runs a cycle.
#[derive(Debug, Clone)]
pub struct AutoPilotSupervisor {
    automatic: bool,
    period: f64,
    elapsed: f64,
}

impl AutoPilotSupervisor {
    pub fn new() -> Self {
        Self::with_period(SUPERVISOR_PERIOD)
    }

    pub fn with_period(period: f64) -> Self {
        Self { automatic: true, period, elapsed: period }
    }

    pub fn set_automatic_mode(&mut self, automatic: bool) {
        self.automatic = automatic;
    }

    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// Advance the accumulator by `dt`; when a period has elapsed run one
    /// decision cycle. Returns the new state if the cycle caused a transition.
    pub fn update(
        &mut self,
        dt: f64,
        machine: &mut FlightStateMachine,
        kin: &KinematicState,
    ) -> Option<FlightState> {
        self.elapsed += dt;
        if self.elapsed < self.period {
            return None;
        }
        self.elapsed %= self.period;

        if !self.automatic {
            return None;
        }
        self.evaluate(machine, kin)
    }

    /// One decision cycle. First matching rule wins; at most one transition.
    pub fn evaluate(
        &self,
        machine: &mut FlightStateMachine,
        kin: &KinematicState,
    ) -> Option<FlightState> {
        let before = machine.state();
        let cruise_height = machine.config().max_height * HOVER_ENTRY_FRACTION;
        trace!(state = %before, height = kin.height(), "supervisor cycle");

        match before {
            FlightState::Grounded if machine.permissions.can_take_off => {
                machine.request_take_off();
            }
            FlightState::Hovering if kin.height() >= cruise_height => {
                machine.request_movement();
            }
            FlightState::Moving if machine.permissions.can_land && final_leg_done(machine, kin) => {
                machine.request_landing();
            }
            _ => {}
        }

        let after = machine.state();
        (after != before).then_some(after)
    }
}

impl Default for AutoPilotSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// On the last waypoint and within the arrival radius of it (straight-line
/// distance, height included).
fn final_leg_done(machine: &FlightStateMachine, kin: &KinematicState) -> bool {
    let Some(last) = machine.waypoints().last_index() else {
        return false;
    };
    if machine.current_waypoint() != last {
        return false;
    }
    machine
        .waypoints()
        .get(last)
        .is_some_and(|wp| (kin.pos - wp).norm() < machine.config().waypoint_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{Permissions, VehicleConfig, WaypointSet};
    use nalgebra::Vector3;

    fn machine(points: Vec<Vector3<f64>>, permissions: Permissions) -> FlightStateMachine {
        FlightStateMachine::new(VehicleConfig::default(), WaypointSet::new(points))
            .with_permissions(permissions)
    }

    fn at(y: f64) -> KinematicState {
        KinematicState::at_rest(Vector3::new(0.0, y, 0.0))
    }

    #[test]
    fn first_update_runs_immediately_then_waits_a_period() {
        let mut m = machine(vec![], Permissions::default());
        let mut sup = AutoPilotSupervisor::new();
        assert_eq!(sup.update(0.02, &mut m, &at(0.0)), None);
        m.permissions.can_take_off = true;
        for _ in 0..23 {
            assert_eq!(sup.update(0.02, &mut m, &at(0.0)), None);
        }
        assert_eq!(m.state(), FlightState::Grounded);
        let fired = (0..3).find_map(|_| sup.update(0.02, &mut m, &at(0.0)));
        assert_eq!(fired, Some(FlightState::TakingOff));
    }

    #[test]
    fn disabled_supervisor_does_nothing() {
        let mut m = machine(vec![], Permissions::all());
        let mut sup = AutoPilotSupervisor::new();
        sup.set_automatic_mode(false);
        assert_eq!(sup.update(1.0, &mut m, &at(0.0)), None);
        assert_eq!(m.state(), FlightState::Grounded);
        m.request_take_off();
        assert_eq!(m.state(), FlightState::TakingOff, "manual requests still work");
    }

    #[test]
    fn one_transition_per_cycle() {
        let mut m = machine(vec![Vector3::new(0.0, 80.0, 0.0)], Permissions::all());
        let sup = AutoPilotSupervisor::new();
        assert_eq!(sup.evaluate(&mut m, &at(80.0)), Some(FlightState::TakingOff));
        assert_eq!(sup.evaluate(&mut m, &at(80.0)), None, "takeoff completes in the tick");
        m.tick(0.02, &at(80.0));
        assert_eq!(m.state(), FlightState::Hovering);
        assert_eq!(sup.evaluate(&mut m, &at(70.0)), None, "too low to cruise");
        assert_eq!(sup.evaluate(&mut m, &at(77.0)), Some(FlightState::Moving));
        assert_eq!(sup.evaluate(&mut m, &at(77.0)), Some(FlightState::Landing));
    }

    #[test]
    fn landing_needs_last_waypoint_and_permission() {
        let points = vec![Vector3::new(0.0, 80.0, 0.0), Vector3::new(200.0, 80.0, 0.0)];
        let mut m = machine(points, Permissions { can_take_off: true, can_land: false });
        let sup = AutoPilotSupervisor::new();
        m.request_take_off();
        m.tick(0.02, &at(79.0));
        m.request_movement();
        assert_eq!(m.current_waypoint(), 0);
        assert_eq!(sup.evaluate(&mut m, &at(80.0)), None, "not on the last waypoint");
        m.tick(0.02, &at(80.0));
        assert_eq!(m.current_waypoint(), 1);
        let near_last = KinematicState::at_rest(Vector3::new(198.0, 80.0, 0.0));
        assert_eq!(sup.evaluate(&mut m, &near_last), None, "landing not permitted");
        m.permissions.can_land = true;
        assert_eq!(sup.evaluate(&mut m, &near_last), Some(FlightState::Landing));
    }
}
