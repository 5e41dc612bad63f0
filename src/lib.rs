pub mod dynamics;
pub mod vehicle;
pub mod control;
pub mod feedback;
pub mod sim;
pub mod io;
pub mod error;

pub use control::{AutoPilotSupervisor, FlightState, FlightStateMachine, PhaseEvent, PhaseListener};
pub use dynamics::{ControlOutput, KinematicOverride, KinematicState, SimConfig};
pub use error::MissionError;
pub use sim::Helicopter;
pub use vehicle::{Permissions, Traversal, VehicleConfig, WaypointSet};
