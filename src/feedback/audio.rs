use crate::control::attitude::lerp;
use crate::control::FlightState;

// ---------------------------------------------------------------------------
// Engine / blade audio levels
// ---------------------------------------------------------------------------

pub const VOLUME_RATE: f64 = 2.0; // 1/s
pub const MIN_PITCH: f64 = 1.0;
pub const MAX_PITCH: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioChannel {
    pub volume: f64,
    pub pitch: f64,
}

impl Default for AudioChannel {
    fn default() -> Self {
        Self { volume: 0.0, pitch: MIN_PITCH }
    }
}

/// Drives the engine channel from flight state and speed; the blade channel
/// mirrors it. Both channels must be present for anything to happen.
#[derive(Debug, Clone)]
pub struct AudioFeedbackMapper {
    max_volume: f64,
    lift_speed: f64,
    forward_speed: f64,
    pub engine: Option<AudioChannel>,
    pub blade: Option<AudioChannel>,
}

impl AudioFeedbackMapper {
    pub fn new(max_volume: f64, lift_speed: f64, forward_speed: f64) -> Self {
        Self {
            max_volume,
            lift_speed,
            forward_speed,
            engine: Some(AudioChannel::default()),
            blade: Some(AudioChannel::default()),
        }
    }

    pub fn without_channels(mut self) -> Self {
        self.engine = None;
        self.blade = None;
        self
    }

    fn target_volume(&self, state: FlightState, vertical_speed: f64) -> f64 {
        match state {
            FlightState::Grounded => 0.0,
            FlightState::TakingOff => lerp(0.0, self.max_volume, vertical_speed / self.lift_speed),
            _ => self.max_volume,
        }
    }

    /// `vertical_speed` feeds the takeoff swell, `speed` the pitch.
    pub fn update(&mut self, dt: f64, state: FlightState, vertical_speed: f64, speed: f64) {
        let target = self.target_volume(state, vertical_speed);
        let (Some(engine), Some(blade)) = (self.engine.as_mut(), self.blade.as_mut()) else {
            return;
        };

        engine.volume = lerp(engine.volume, target, VOLUME_RATE * dt);
        engine.pitch = lerp(MIN_PITCH, MAX_PITCH, speed / self.forward_speed);
        *blade = *engine;
    }

    pub fn volume(&self) -> f64 {
        self.engine.map_or(0.0, |c| c.volume)
    }

    pub fn pitch(&self) -> f64 {
        self.engine.map_or(MIN_PITCH, |c| c.pitch)
    }
}
