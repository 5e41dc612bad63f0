use std::io::{self, Write};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::FlightState;
use crate::error::MissionError;
use crate::sim::{Helicopter, Sample, SimEvent};
use crate::sim::event::EventKind;
use crate::vehicle::{Permissions, VehicleConfig, WaypointSet};

// ---------------------------------------------------------------------------
// Mission documents
// ---------------------------------------------------------------------------

/// Everything needed to set up a flight: tuning, permissions, route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionFile {
    pub name: String,
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default = "default_automatic")]
    pub automatic: bool,
    #[serde(default)]
    pub waypoints: Vec<[f64; 3]>,
}

fn default_automatic() -> bool {
    true
}

impl MissionFile {
    pub fn waypoint_set(&self) -> WaypointSet {
        self.waypoints
            .iter()
            .map(|&[x, y, z]| Vector3::new(x, y, z))
            .collect::<Vec<_>>()
            .into()
    }

    /// Build a helicopter parked at the first waypoint.
    pub fn helicopter(&self) -> Helicopter {
        let mut heli = Helicopter::new(self.vehicle.clone(), self.waypoint_set())
            .with_permissions(self.permissions);
        heli.set_automatic_mode(self.automatic);
        heli
    }
}

pub fn parse_mission(text: &str) -> Result<MissionFile, MissionError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_mission(path: &str) -> Result<MissionFile, MissionError> {
    let text = std::fs::read_to_string(path).map_err(|source| MissionError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_mission(&text)
}

// ---------------------------------------------------------------------------
// Flight summary
// ---------------------------------------------------------------------------

/// Summary statistics computed from a flight trajectory.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub mission: String,
    pub flight_time: f64,
    pub max_height: f64,
    pub max_speed: f64,
    pub distance_flown: f64,
    pub waypoints_reached: usize,
    pub time_to_hover: Option<f64>,
    pub final_state: FlightState,
}

impl FlightSummary {
    /// Compute summary from trajectory data. `trajectory` must be non-empty.
    pub fn from_run(mission: &str, trajectory: &[Sample], events: &[SimEvent]) -> Self {
        let max_height = trajectory
            .iter()
            .map(|s| s.state.pos.y)
            .fold(0.0_f64, f64::max);

        let max_speed = trajectory
            .iter()
            .map(|s| s.state.speed())
            .fold(0.0_f64, f64::max);

        let distance_flown = trajectory
            .windows(2)
            .map(|w| (w[1].state.pos - w[0].state.pos).norm())
            .sum();

        let waypoints_reached = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::WaypointReached { .. }))
            .count();

        let time_to_hover = events.iter().find_map(|e| match e.kind {
            EventKind::Transition { to: FlightState::Hovering, .. } => Some(e.time),
            _ => None,
        });

        let (flight_time, final_state) = trajectory
            .last()
            .map_or((0.0, FlightState::Grounded), |s| (s.time, s.flight));

        FlightSummary {
            mission: mission.to_string(),
            flight_time,
            max_height,
            max_speed,
            distance_flown,
            waypoints_reached,
            time_to_hover,
            final_state,
        }
    }
}

/// Write flight summary as JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &FlightSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
