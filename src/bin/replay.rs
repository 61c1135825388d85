// Replay a recorded sensor session (JSONL) through the navigation filter,
// or run a built-in synthetic flight when no log is given. Prints a
// one-line solution summary once per second of flight time and optionally
// writes the full snapshot stream for plotting.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};

use nav_ekf_rs::maths::ne_to_latlon;
use nav_ekf_rs::{
    AirspeedSample, BaroSample, EkfConfig, GeoPosition, GpsFix, ImuSample, MagSample, NavEkf,
    VehicleKind,
};

#[derive(Parser, Debug)]
#[command(about = "Replay a sensor log through the navigation EKF")]
struct Args {
    /// Path to a JSONL sensor log; omit to run the synthetic flight
    #[arg(long)]
    log: Option<PathBuf>,

    /// Vehicle profile: copter, rover or plane
    #[arg(long, default_value = "copter")]
    vehicle: String,

    /// Write every snapshot to this JSONL file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Duration of the synthetic flight (seconds)
    #[arg(long, default_value = "60.0")]
    duration: f64,
}

/// One line of a recorded session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record {
    Home(GeoPosition),
    Imu(ImuSample),
    Gps(GpsFix),
    Baro(BaroSample),
    Mag(MagSample),
    Airspeed(AirspeedSample),
    /// Arming state changes
    Armed { armed: bool },
}

fn vehicle_kind(name: &str) -> anyhow::Result<VehicleKind> {
    match name {
        "copter" => Ok(VehicleKind::Copter),
        "rover" => Ok(VehicleKind::Rover),
        "plane" => Ok(VehicleKind::Plane),
        other => bail!("unknown vehicle profile {other:?}"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = EkfConfig::for_vehicle(vehicle_kind(&args.vehicle)?);
    let mut ekf = NavEkf::new(config);
    ekf.set_compass_use(true);

    let records = match &args.log {
        Some(path) => load_log(path)?,
        None => synthetic_flight(args.duration),
    };
    if records.is_empty() {
        bail!("no records to replay");
    }

    let mut output = match &args.output {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => None,
    };

    println!(
        "# replay started {} ({} records)",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        records.len()
    );

    let mut initialised = false;
    let mut last_print_ms = 0u64;
    for record in records {
        match record {
            Record::Home(home) => ekf.set_home(home),
            Record::Armed { armed } => ekf.set_vehicle_status(armed, true),
            Record::Gps(fix) => ekf.push_gps(fix),
            Record::Baro(sample) => ekf.push_baro(sample),
            Record::Mag(sample) => ekf.push_mag(sample),
            Record::Airspeed(sample) => ekf.push_airspeed(sample),
            Record::Imu(imu) => {
                if !initialised {
                    ekf.initialise_filter_bootstrap(&imu);
                    initialised = true;
                    continue;
                }
                ekf.update(&imu);
                let snap = ekf.snapshot();
                if let Some(out) = output.as_mut() {
                    serde_json::to_writer(&mut *out, &snap)?;
                    out.write_all(b"\n")?;
                }
                if snap.timestamp_ms.saturating_sub(last_print_ms) >= 1000 {
                    last_print_ms = snap.timestamp_ms;
                    println!(
                        "t={:7.2}s healthy={} rpy=({:6.1},{:6.1},{:6.1})deg \
                         vel=({:6.2},{:6.2},{:6.2})m/s pos=({:7.1},{:7.1},{:7.1})m faults={:#04x}",
                        snap.timestamp_ms as f64 / 1000.0,
                        snap.healthy,
                        snap.euler.0.to_degrees(),
                        snap.euler.1.to_degrees(),
                        snap.euler.2.to_degrees(),
                        snap.velocity_ned.0,
                        snap.velocity_ned.1,
                        snap.velocity_ned.2,
                        snap.position_ned.0,
                        snap.position_ned.1,
                        snap.position_ned.2,
                        snap.fault_bitmap,
                    );
                }
            }
        }
    }

    if let Some(mut out) = output {
        out.flush()?;
    }
    Ok(())
}

fn load_log(path: &PathBuf) -> anyhow::Result<Vec<Record>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let record: Record =
            serde_json::from_str(&line).with_context(|| format!("parsing line {}", n + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Built-in scenario: five seconds at rest, then a constant-velocity cruise
/// east at 15 m/s. Useful as a smoke test and as a template for the log
/// format.
fn synthetic_flight(duration_s: f64) -> Vec<Record> {
    const G: f64 = 9.80665;
    const DT: f64 = 0.0025;
    let home = GeoPosition { latitude: 47.3977, longitude: 8.5456, altitude: 488.0 };
    let mut records = vec![
        Record::Home(home),
        Record::Armed { armed: true },
        // seed one sample of each sensor so the bootstrap on the first IMU
        // record has attitude and height references to work from
        Record::Mag(MagSample {
            timestamp_ms: 1,
            field: (300.0, 0.0, 500.0),
            offsets: (0.0, 0.0, 0.0),
        }),
        Record::Baro(BaroSample { timestamp_ms: 1, altitude: 0.0 }),
        Record::Gps(GpsFix {
            timestamp_ms: 1,
            fix_3d: true,
            latitude: home.latitude,
            longitude: home.longitude,
            vel_ned: (0.0, 0.0, 0.0),
            num_sats: 9,
            have_vertical_velocity: true,
        }),
    ];

    let steps = (duration_s / DT) as u64;
    let cruise_vel = 15.0; // m/s east
    let takeoff_ms = 5_000u64;
    for k in 0..steps {
        let t_ms = (k as f64 * DT * 1000.0) as u64;
        let airborne = t_ms > takeoff_ms;
        let east = if airborne {
            (t_ms - takeoff_ms) as f64 * 0.001 * cruise_vel
        } else {
            0.0
        };

        records.push(Record::Imu(ImuSample {
            timestamp_ms: t_ms,
            dt: DT,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        }));
        if t_ms % 200 == 0 && k > 0 {
            let (lat, lon) = ne_to_latlon(0.0, east, home.latitude, home.longitude);
            records.push(Record::Gps(GpsFix {
                timestamp_ms: t_ms,
                fix_3d: true,
                latitude: lat,
                longitude: lon,
                vel_ned: (0.0, if airborne { cruise_vel } else { 0.0 }, 0.0),
                num_sats: 9,
                have_vertical_velocity: true,
            }));
        }
        if t_ms % 100 == 0 && k > 0 {
            records.push(Record::Baro(BaroSample {
                timestamp_ms: t_ms,
                altitude: if airborne { 20.0 } else { 0.0 },
            }));
            // level field pointing north with a modest down component
            records.push(Record::Mag(MagSample {
                timestamp_ms: t_ms,
                field: (300.0, 0.0, 500.0),
                offsets: (0.0, 0.0, 0.0),
            }));
        }
    }
    records
}
