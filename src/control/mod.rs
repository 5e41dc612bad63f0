pub mod attitude;
pub mod events;
pub mod laws;
pub mod state_machine;
pub mod supervisor;

pub use events::{NullListener, PhaseEvent, PhaseListener};
pub use state_machine::{FlightState, FlightStateMachine};
pub use supervisor::{AutoPilotSupervisor, SUPERVISOR_PERIOD};
