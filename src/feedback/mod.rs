pub mod audio;
pub mod rotor;

pub use audio::{AudioChannel, AudioFeedbackMapper};
pub use rotor::{Rotor, RotorAnimator, RotorDelta};
