pub mod body;
pub mod event;
pub mod runner;

pub use body::RigidBody;
pub use event::{AltitudeDetector, EventDetector, EventKind, EventLog, SimEvent};
pub use runner::{simulate, simulate_with, Helicopter, Sample};
