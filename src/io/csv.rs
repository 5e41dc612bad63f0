use std::io::{self, Write};

use crate::control::attitude;
use crate::sim::Sample;

/// Write trajectory data to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          quat_w, quat_x, quat_y, quat_z, yaw_deg,
///          state, waypoint, rotor_spin, volume, pitch
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[Sample]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         quat_w,quat_x,quat_y,quat_z,yaw_deg,\
         state,waypoint,rotor_spin,volume,pitch"
    )?;

    for s in trajectory {
        let k = &s.state;
        let q = k.quat.quaternion();
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.6},{:.6},{:.6},{:.6},{:.2},\
             {},{},{:.4},{:.4},{:.4}",
            s.time,
            k.pos.x, k.pos.y, k.pos.z,
            k.vel.x, k.vel.y, k.vel.z,
            q.w, q.i, q.j, q.k,
            attitude::yaw_deg(&k.quat),
            s.flight,
            s.waypoint,
            s.rotor_spin,
            s.volume,
            s.pitch,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}
