pub mod config;
pub mod waypoints;

pub use config::{presets, Permissions, VehicleConfig, VehicleConfigBuilder};
pub use waypoints::{NavigationCursor, Traversal, WaypointSet};
