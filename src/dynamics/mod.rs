pub mod state;

pub use state::{ControlOutput, KinematicOverride, KinematicState, SimConfig, GRAVITY};
