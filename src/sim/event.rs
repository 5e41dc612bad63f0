use std::cell::RefCell;
use std::rc::Rc;

use crate::control::{FlightState, PhaseEvent, PhaseListener};
use super::runner::Sample;

// ---------------------------------------------------------------------------
// Recording phase listener
// ---------------------------------------------------------------------------

/// Shared, cloneable log of phase notifications. Hand one clone to the
/// state machine and keep another to inspect what fired.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PhaseEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PhaseEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: PhaseEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl PhaseListener for EventLog {
    fn on_event(&mut self, event: PhaseEvent) {
        self.events.borrow_mut().push(event);
    }
}

// ---------------------------------------------------------------------------
// Simulation timeline events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Transition { from: FlightState, to: FlightState },
    WaypointReached { index: usize },
    Altitude { height: f64, ascending: bool },
}

/// A discrete event observed between two consecutive samples.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub sample: Sample,
}

/// Passive detectors inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind>;
}

/// Flight state changed.
pub struct TransitionDetector;

impl EventDetector for TransitionDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        (prev.flight != current.flight).then_some(EventKind::Transition {
            from: prev.flight,
            to: current.flight,
        })
    }
}

/// Navigation cursor moved on. Arrival can coincide with entering cruise
/// (already on top of the first waypoint) or with the wrap-around landing
/// request, so only the resulting state is checked.
pub struct WaypointDetector;

impl EventDetector for WaypointDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        let airborne = matches!(current.flight, FlightState::Moving | FlightState::Landing);
        let reached = airborne && prev.waypoint != current.waypoint;
        reached.then_some(EventKind::WaypointReached { index: prev.waypoint })
    }
}

/// Height crosses a threshold (ascending or descending). Fires once.
pub struct AltitudeDetector {
    pub height: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(height: f64, ascending: bool) -> Self {
        Self { height, ascending, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let (a, b) = (prev.state.pos.y, current.state.pos.y);
        let crossed = if self.ascending {
            a < self.height && b >= self.height
        } else {
            a > self.height && b <= self.height
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Altitude { height: self.height, ascending: self.ascending })
        } else {
            None
        }
    }
}
