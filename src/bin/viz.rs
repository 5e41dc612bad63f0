use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use rotor_autopilot::control::attitude;
use rotor_autopilot::dynamics::SimConfig;
use rotor_autopilot::io::json::{self, MissionFile};
use rotor_autopilot::sim::{self, Sample};
use rotor_autopilot::vehicle::{presets, Permissions};

fn main() -> eframe::Result {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let mission = std::env::args()
        .nth(1)
        .and_then(|path| match json::load_mission(&path) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::error!("{e}; using built-in mission");
                None
            }
        })
        .unwrap_or_else(|| MissionFile {
            name: "Survey Box".into(),
            vehicle: presets::survey(),
            permissions: Permissions::all(),
            automatic: true,
            waypoints: vec![
                [0.0, 0.0, 0.0],
                [150.0, 0.0, 0.0],
                [150.0, 0.0, 150.0],
                [0.0, 0.0, 150.0],
            ],
        });

    let config = SimConfig { dt: 0.02, max_time: 600.0 };
    let mut heli = mission.helicopter();
    let (trajectory, _) = sim::simulate(&mut heli, &config);

    let app = FlightViz { trajectory, mission };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Rotorcraft Autopilot", options, Box::new(|_| Ok(Box::new(app))))
}

struct FlightViz {
    trajectory: Vec<Sample>,
    mission: MissionFile,
}

impl eframe::App for FlightViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.trajectory.len() / 2000).max(1);
        let sampled: Vec<&Sample> = self.trajectory.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Mission: {}", self.mission.name));
            let max_h = self.trajectory.iter().map(|s| s.state.pos.y).fold(0.0_f64, f64::max);
            let max_v = self.trajectory.iter().map(|s| s.state.speed()).fold(0.0_f64, f64::max);
            ui.label(format!(
                "Max height: {:.1} m  |  Max speed: {:.1} m/s  |  Waypoints: {}  |  Flight: {:.0} s",
                max_h,
                max_v,
                self.mission.waypoints.len(),
                self.trajectory.last().map_or(0.0, |s| s.time),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Height (m)");
                    let points: PlotPoints = sampled.iter()
                        .map(|s| [s.time, s.state.pos.y])
                        .collect();
                    Plot::new("height")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Height", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    let total: PlotPoints = sampled.iter()
                        .map(|s| [s.time, s.state.speed()])
                        .collect();
                    let horizontal: PlotPoints = sampled.iter()
                        .map(|s| [s.time, s.state.horizontal_vel().norm()])
                        .collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", total));
                            plot_ui.line(Line::new("Horizontal", horizontal));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Ground Track (m)");
                    let track: PlotPoints = sampled.iter()
                        .map(|s| [s.state.pos.x, s.state.pos.z])
                        .collect();
                    let route: PlotPoints = self.mission.waypoints.iter()
                        .map(|&[x, _, z]| [x, z])
                        .collect();
                    Plot::new("track")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Track", track));
                            plot_ui.points(Points::new("Waypoints", route).radius(4.0));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Feedback");
                    let spin: PlotPoints = sampled.iter()
                        .map(|s| [s.time, s.rotor_spin])
                        .collect();
                    let volume: PlotPoints = sampled.iter()
                        .map(|s| [s.time, s.volume])
                        .collect();
                    let pitch: PlotPoints = sampled.iter()
                        .map(|s| [s.time, s.pitch])
                        .collect();
                    let yaw: PlotPoints = sampled.iter()
                        .map(|s| [s.time, attitude::yaw_deg(&s.state.quat) / 180.0])
                        .collect();
                    Plot::new("feedback")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(egui_plot::Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Rotor spin", spin));
                            plot_ui.line(Line::new("Volume", volume));
                            plot_ui.line(Line::new("Pitch", pitch));
                            plot_ui.line(Line::new("Heading / 180°", yaw));
                        });
                });
            });
        });
    }
}
