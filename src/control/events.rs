use std::fmt;

/// Phase-change signals, fired once per corresponding transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    TakeOff,
    Hover,
    Landing,
    Moving,
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseEvent::TakeOff => "takeoff",
            PhaseEvent::Hover => "hover",
            PhaseEvent::Landing => "landing",
            PhaseEvent::Moving => "moving",
        };
        f.pad(s)
    }
}

/// Receiver for phase-change notifications.
///
/// Implement the hooks you care about; the rest default to no-ops.
pub trait PhaseListener {
    fn on_take_off(&mut self) {}
    fn on_hover(&mut self) {}
    fn on_landing(&mut self) {}
    fn on_moving(&mut self) {}

    /// Route an event to its hook.
    fn on_event(&mut self, event: PhaseEvent) {
        match event {
            PhaseEvent::TakeOff => self.on_take_off(),
            PhaseEvent::Hover => self.on_hover(),
            PhaseEvent::Landing => self.on_landing(),
            PhaseEvent::Moving => self.on_moving(),
        }
    }
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl PhaseListener for NullListener {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hovers: u32,
        other: u32,
    }

    impl PhaseListener for Counter {
        fn on_hover(&mut self) {
            self.hovers += 1;
        }
        fn on_take_off(&mut self) {
            self.other += 1;
        }
    }

    #[test]
    fn on_event_dispatches_to_hook() {
        let mut c = Counter::default();
        c.on_event(PhaseEvent::Hover);
        c.on_event(PhaseEvent::TakeOff);
        c.on_event(PhaseEvent::Landing);
        assert_eq!(c.hovers, 1);
        assert_eq!(c.other, 1);
        assert_eq!(PhaseEvent::Moving.to_string(), "moving");
    }
}
