use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use rotor_autopilot::dynamics::SimConfig;
use rotor_autopilot::io::csv;
use rotor_autopilot::io::json::{self, FlightSummary, MissionFile};
use rotor_autopilot::sim::{self, AltitudeDetector, EventDetector, EventKind, Sample};
use rotor_autopilot::vehicle::{presets, Permissions};

/// Built-in patrol used when no mission file is given.
fn default_mission() -> MissionFile {
    MissionFile {
        name: "Harbour Patrol".into(),
        vehicle: presets::utility(),
        permissions: Permissions::all(),
        automatic: true,
        waypoints: vec![
            [0.0, 0.0, 0.0],
            [200.0, 0.0, 0.0],
            [200.0, 0.0, 150.0],
            [0.0, 0.0, 150.0],
        ],
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // -----------------------------------------------------------------------
    // Arguments: [mission.json] [--csv out.csv] [--json out.json]
    // -----------------------------------------------------------------------
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut mission_path = None;
    let mut csv_path = None;
    let mut json_path = None;
    let mut it = args.iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--csv" => csv_path = it.next().cloned(),
            "--json" => json_path = it.next().cloned(),
            other => mission_path = Some(other.to_string()),
        }
    }

    let mission = match mission_path.as_deref().map(json::load_mission) {
        Some(Ok(m)) => m,
        Some(Err(e)) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
        None => default_mission(),
    };

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let config = SimConfig { dt: 0.02, max_time: 600.0 };
    let cruise_alt = mission.vehicle.max_height * 0.5;
    let mut heli = mission.helicopter();
    let detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(AltitudeDetector::new(cruise_alt, true)),
        Box::new(AltitudeDetector::new(cruise_alt, false)),
    ];
    let (trajectory, events) = sim::simulate_with(&mut heli, &config, detectors);
    let summary = FlightSummary::from_run(&mission.name, &trajectory, &events);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let v = &mission.vehicle;
    println!();
    println!("====================================================================");
    println!("  ROTORCRAFT AUTOPILOT — {}", mission.name);
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Ceiling:       {:>8.1} m     Cruise speed: {:>8.1} m/s",
        v.max_height, v.forward_speed
    );
    println!(
        "  Lift:          {:>8.1} m/s²  Hover force:  {:>8.1} m/s²",
        v.lift_speed, v.hover_force
    );
    println!(
        "  Turn rate:     {:>8.2} 1/s   WP radius:    {:>8.1} m",
        v.turn_speed, v.waypoint_radius
    );
    println!("  Route:         {:>8} waypoints ({:?})", mission.waypoints.len(), v.traversal);
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &events {
        let what = match &e.kind {
            EventKind::Transition { from, to } => format!("{from:<8} -> {to}"),
            EventKind::WaypointReached { index } => format!("waypoint {index} reached"),
            EventKind::Altitude { height, ascending } => format!(
                "{} {:.0} m",
                if *ascending { "climbing through" } else { "descending through" },
                height
            ),
        };
        println!(
            "  t={:>7.2}s   {:<34} pos=({:>7.1},{:>6.1},{:>7.1})",
            e.time, what, e.sample.state.pos.x, e.sample.state.pos.y, e.sample.state.pos.z
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Max height:    {:>8.1} m", summary.max_height);
    println!("  Max speed:     {:>8.1} m/s", summary.max_speed);
    println!("  Distance:      {:>8.0} m", summary.distance_flown);
    println!("  Waypoints:     {:>8}", summary.waypoints_reached);
    if let Some(t) = summary.time_to_hover {
        println!("  Time to hover: {:>8.1} s", t);
    }
    println!("  Flight time:   {:>8.1} s   (ended {})", summary.flight_time, summary.final_state);
    println!();

    print_table(&trajectory);

    println!();
    println!("  Simulation: {} steps, dt={} s", trajectory.len(), config.dt);
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Exports
    // -----------------------------------------------------------------------
    if let Some(path) = csv_path {
        if let Err(e) = csv::write_trajectory_file(&path, &trajectory) {
            error!("failed to write {path}: {e}");
            return ExitCode::FAILURE;
        }
        println!("Exported: {path}");
    }
    if let Some(path) = json_path {
        if let Err(e) = json::write_summary_file(&path, &summary) {
            error!("failed to write {path}: {e}");
            return ExitCode::FAILURE;
        }
        println!("Exported: {path}");
    }

    ExitCode::SUCCESS
}

/// Sampled trajectory table.
fn print_table(trajectory: &[Sample]) {
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>6}  {:>5}  {:>7}",
        "t (s)", "x (m)", "h (m)", "z (m)", "v(m/s)", "spin", "state"
    );
    println!("  {}", "─".repeat(62));

    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        let print = i % sample_interval == 0
            || i == trajectory.len() - 1
            || trajectory.get(i.wrapping_sub(1)).is_some_and(|p| p.flight != s.flight);
        if !print {
            continue;
        }
        println!(
            "  {:>7.2}  {:>8.1}  {:>8.1}  {:>8.1}  {:>6.1}  {:>5.2}  {:>7}",
            s.time,
            s.state.pos.x,
            s.state.pos.y,
            s.state.pos.z,
            s.state.speed(),
            s.rotor_spin,
            s.flight
        );
    }
}
