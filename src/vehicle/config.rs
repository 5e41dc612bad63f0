use serde::{Deserialize, Serialize};

use super::waypoints::Traversal;

// ---------------------------------------------------------------------------
// Vehicle tunables (set once before the first tick)
// ---------------------------------------------------------------------------

/// Immutable tuning of the vehicle and its cosmetic feedback.
///
/// The controller does not validate these values: `max_height <= 0` or
/// `forward_speed <= 0` are the caller's problem and produce meaningless
/// (but non-panicking) output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub hover_force: f64,        // m/s^2, sustaining upward acceleration
    pub forward_speed: f64,      // m/s, cruise speed cap
    pub turn_speed: f64,         // 1/s, attitude slerp rate
    pub lift_speed: f64,         // m/s^2, takeoff/landing authority
    pub max_height: f64,         // m, hard ceiling
    pub waypoint_radius: f64,    // m, horizontal arrival radius
    pub main_rotor_speed: f64,   // deg/s at full spin
    pub tail_rotor_speed: f64,   // deg/s at full spin
    pub max_engine_volume: f64,  // [0, 1]
    pub traversal: Traversal,
    /// Hold the height captured on entering Hovering instead of relying on
    /// `hover_force` alone.
    pub hover_hold: bool,
    /// Seed for random waypoint traversal. `None` draws one from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            hover_force: 150.0,
            forward_speed: 50.0,
            turn_speed: 2.0,
            lift_speed: 25.0,
            max_height: 80.0,
            waypoint_radius: 5.0,
            main_rotor_speed: 500.0,
            tail_rotor_speed: 700.0,
            max_engine_volume: 1.0,
            traversal: Traversal::Sequential,
            hover_hold: false,
            rng_seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Permissions (operator-controlled, mutable at any time)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub can_take_off: bool,
    pub can_land: bool,
}

impl Permissions {
    pub fn all() -> Self {
        Self { can_take_off: true, can_land: true }
    }
}

// ---------------------------------------------------------------------------
// Config builder
// ---------------------------------------------------------------------------

pub struct VehicleConfigBuilder {
    config: VehicleConfig,
}

impl VehicleConfigBuilder {
    pub fn new() -> Self {
        Self { config: VehicleConfig::default() }
    }

    pub fn hover_force(mut self, v: f64) -> Self { self.config.hover_force = v; self }
    pub fn forward_speed(mut self, v: f64) -> Self { self.config.forward_speed = v; self }
    pub fn turn_speed(mut self, v: f64) -> Self { self.config.turn_speed = v; self }
    pub fn lift_speed(mut self, v: f64) -> Self { self.config.lift_speed = v; self }
    pub fn max_height(mut self, v: f64) -> Self { self.config.max_height = v; self }
    pub fn waypoint_radius(mut self, v: f64) -> Self { self.config.waypoint_radius = v; self }
    pub fn main_rotor_speed(mut self, v: f64) -> Self { self.config.main_rotor_speed = v; self }
    pub fn tail_rotor_speed(mut self, v: f64) -> Self { self.config.tail_rotor_speed = v; self }
    pub fn max_engine_volume(mut self, v: f64) -> Self { self.config.max_engine_volume = v; self }
    pub fn traversal(mut self, v: Traversal) -> Self { self.config.traversal = v; self }
    pub fn hover_hold(mut self, v: bool) -> Self { self.config.hover_hold = v; self }
    pub fn rng_seed(mut self, seed: u64) -> Self { self.config.rng_seed = Some(seed); self }

    pub fn build(self) -> VehicleConfig {
        self.config
    }
}

impl Default for VehicleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Stock utility helicopter, sequential patrol.
    pub fn utility() -> VehicleConfig {
        VehicleConfig::default()
    }

    /// Low and slow survey ship that picks waypoints at random.
    pub fn survey() -> VehicleConfig {
        VehicleConfigBuilder::new()
            .forward_speed(25.0)
            .turn_speed(1.5)
            .max_height(40.0)
            .waypoint_radius(8.0)
            .traversal(Traversal::Random)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let c = VehicleConfigBuilder::new().max_height(120.0).rng_seed(7).build();
        assert_eq!(c.max_height, 120.0);
        assert_eq!(c.rng_seed, Some(7));
        assert_eq!(c.forward_speed, VehicleConfig::default().forward_speed);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c: VehicleConfig =
            serde_json::from_str(r#"{ "max_height": 60.0, "traversal": "random" }"#).unwrap();
        assert_eq!(c.max_height, 60.0);
        assert_eq!(c.traversal, Traversal::Random);
        assert_eq!(c.hover_force, 150.0);
    }

    #[test]
    fn permissions_default_closed() {
        let p = Permissions::default();
        assert!(!p.can_take_off && !p.can_land);
    }
}
