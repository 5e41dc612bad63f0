use nalgebra::Vector3;

use rotor_autopilot::control::{FlightState, PhaseListener};
use rotor_autopilot::io::csv;
use rotor_autopilot::sim::{Helicopter, Sample};
use rotor_autopilot::vehicle::{Permissions, Traversal, VehicleConfigBuilder, WaypointSet};

/// Prints a line for every phase change, the way a cockpit annunciator would.
struct Annunciator {
    callsign: &'static str,
}

impl PhaseListener for Annunciator {
    fn on_take_off(&mut self) {
        println!("[{}] rotors up, lifting", self.callsign);
    }

    fn on_hover(&mut self) {
        println!("[{}] holding at ceiling", self.callsign);
    }

    fn on_moving(&mut self) {
        println!("[{}] proceeding on patrol", self.callsign);
    }

    fn on_landing(&mut self) {
        println!("[{}] descending to pad", self.callsign);
    }
}

fn main() {
    let config = VehicleConfigBuilder::new()
        .max_height(40.0)
        .forward_speed(20.0)
        .traversal(Traversal::Random)
        .rng_seed(7)
        .build();

    let route = WaypointSet::new(vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(90.0, 0.0, 20.0),
        Vector3::new(60.0, 0.0, 110.0),
        Vector3::new(-30.0, 0.0, 70.0),
    ]);

    // Manual flight: the operator script below drives every transition.
    let mut heli = Helicopter::new(config, route)
        .with_permissions(Permissions::all())
        .with_listener(Box::new(Annunciator { callsign: "HARBOUR-2" }));
    heli.set_automatic_mode(false);

    let dt = 0.02;
    let patrol_time = 90.0;
    let mut trajectory: Vec<Sample> = vec![heli.sample()];

    heli.request_take_off();
    while heli.time() < 240.0 {
        match heli.state() {
            FlightState::Hovering if heli.time() < patrol_time => heli.request_movement(),
            FlightState::Moving if heli.time() >= patrol_time => heli.request_landing(),
            _ => {}
        }

        let s = heli.step(dt);
        let done = s.flight == FlightState::Grounded;
        trajectory.push(s);
        if done {
            break;
        }
    }

    let visited: Vec<usize> = trajectory
        .windows(2)
        .filter(|w| w[0].waypoint != w[1].waypoint)
        .map(|w| w[0].waypoint)
        .collect();
    println!("Waypoints visited: {visited:?}");
    println!("Flight time: {:.1} s", heli.time());

    csv::write_trajectory_file("patrol_trajectory.csv", &trajectory)
        .expect("Failed to write CSV");
    println!("Exported: patrol_trajectory.csv");
}
