// End-to-end scenarios driving the filter with a synthetic truth model:
// consistent IMU, GPS, baro, magnetometer and airspeed streams generated
// from a simple planar flight, with per-sensor latencies applied to the
// measurement content the way a real receiver lags the inertial data.

use std::collections::VecDeque;

use nalgebra::{Vector2, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nav_ekf_rs::maths::ne_to_latlon;
use nav_ekf_rs::{
    AirspeedSample, BaroSample, EkfConfig, GeoPosition, GpsFix, ImuSample, MagSample, NavEkf,
    VehicleKind,
};

const G: f64 = 9.80665;
const DT: f64 = 0.0025;

const GPS_PERIOD_MS: u64 = 200;
const BARO_PERIOD_MS: u64 = 100;
const MAG_PERIOD_MS: u64 = 100;
const TAS_PERIOD_MS: u64 = 250;

const GPS_DELAY_S: f64 = 0.220;
const BARO_DELAY_S: f64 = 0.060;
const MAG_DELAY_S: f64 = 0.040;
const TAS_DELAY_S: f64 = 0.240;

const EARTH_FIELD: Vector3<f64> = Vector3::new(0.3, 0.0, 0.5);

const HOME: GeoPosition = GeoPosition {
    latitude: 47.3977,
    longitude: 8.5456,
    altitude: 488.0,
};

/// Planar truth model: body X along the course, yaw equal to course, level
/// flight. Generates sensor streams consistent with the motion.
struct FlightSim {
    ekf: NavEkf,
    t: f64,
    yaw: f64,
    speed: f64,
    pos: Vector3<f64>,
    hist: VecDeque<(f64, Vector3<f64>, Vector3<f64>)>,
    gps_on: bool,
    mag_on: bool,
    tas_on: bool,
    gps_err: Vector2<f64>,
    next_gps_ms: u64,
    next_baro_ms: u64,
    next_mag_ms: u64,
    next_tas_ms: u64,
}

impl FlightSim {
    fn new(kind: VehicleKind, airspeed: bool, yaw0: f64) -> Self {
        let mut ekf = NavEkf::new(EkfConfig::for_vehicle(kind));
        ekf.set_home(HOME);
        ekf.set_compass_use(true);
        ekf.set_airspeed_use(airspeed);
        ekf.set_vehicle_status(true, true);

        let mut sim = FlightSim {
            ekf,
            t: 0.0,
            yaw: yaw0,
            speed: 0.0,
            pos: Vector3::zeros(),
            hist: VecDeque::new(),
            gps_on: true,
            mag_on: true,
            tas_on: airspeed,
            gps_err: Vector2::zeros(),
            next_gps_ms: GPS_PERIOD_MS,
            next_baro_ms: BARO_PERIOD_MS,
            next_mag_ms: MAG_PERIOD_MS,
            next_tas_ms: TAS_PERIOD_MS,
        };
        sim.hist.push_back((0.0, sim.pos, Vector3::zeros()));

        // seed the filter with one sample of every sensor, then bootstrap
        let mag = sim.mag_sample(1, yaw0);
        sim.ekf.push_mag(mag);
        sim.ekf.push_baro(BaroSample { timestamp_ms: 1, altitude: 0.0 });
        let fix = sim.gps_sample(1, sim.pos, Vector3::zeros());
        sim.ekf.push_gps(fix);
        if airspeed {
            sim.ekf
                .push_airspeed(AirspeedSample { timestamp_ms: 1, airspeed: 0.0, eas2tas: 1.0 });
        }
        sim.ekf.initialise_filter_bootstrap(&ImuSample {
            timestamp_ms: 0,
            dt: DT,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        });
        sim
    }

    fn truth_at(&self, t: f64) -> (Vector3<f64>, Vector3<f64>) {
        let mut best = self.hist.front().copied().unwrap();
        for entry in self.hist.iter() {
            if entry.0 <= t {
                best = *entry;
            } else {
                break;
            }
        }
        (best.1, best.2)
    }

    fn yaw_at(&self, t: f64) -> f64 {
        // yaw follows the course; reconstruct from the velocity history when
        // moving, otherwise use the current yaw
        let (_, vel) = self.truth_at(t);
        if vel.norm() > 0.5 {
            vel.y.atan2(vel.x)
        } else {
            self.yaw
        }
    }

    fn gps_sample(&self, t_ms: u64, pos: Vector3<f64>, vel: Vector3<f64>) -> GpsFix {
        let (latitude, longitude) = ne_to_latlon(
            pos.x + self.gps_err.x,
            pos.y + self.gps_err.y,
            HOME.latitude,
            HOME.longitude,
        );
        GpsFix {
            timestamp_ms: t_ms,
            fix_3d: true,
            latitude,
            longitude,
            vel_ned: (vel.x, vel.y, vel.z),
            num_sats: 9,
            have_vertical_velocity: true,
        }
    }

    fn mag_sample(&self, t_ms: u64, yaw: f64) -> MagSample {
        // rotate the earth field into body axes for a level vehicle and
        // scale to device units
        let bx = yaw.cos() * EARTH_FIELD.x + yaw.sin() * EARTH_FIELD.y;
        let by = -yaw.sin() * EARTH_FIELD.x + yaw.cos() * EARTH_FIELD.y;
        MagSample {
            timestamp_ms: t_ms,
            field: (bx * 1000.0, by * 1000.0, EARTH_FIELD.z * 1000.0),
            offsets: (0.0, 0.0, 0.0),
        }
    }

    /// Advance one IMU step with the given yaw rate and along-track
    /// acceleration, generating sensor pushes at their cadences.
    fn step(&mut self, yaw_rate: f64, accel_along: f64) {
        self.t += DT;
        self.speed += accel_along * DT;
        self.yaw += yaw_rate * DT;
        let vel = Vector3::new(self.speed * self.yaw.cos(), self.speed * self.yaw.sin(), 0.0);
        self.pos += vel * DT;
        self.hist.push_back((self.t, self.pos, vel));
        if self.hist.len() > 800 {
            self.hist.pop_front();
        }

        let t_ms = (self.t * 1000.0).round() as u64;
        if self.gps_on && t_ms >= self.next_gps_ms {
            self.next_gps_ms = t_ms + GPS_PERIOD_MS;
            let (pos, vel) = self.truth_at(self.t - GPS_DELAY_S);
            let fix = self.gps_sample(t_ms, pos, vel);
            self.ekf.push_gps(fix);
        }
        if t_ms >= self.next_baro_ms {
            self.next_baro_ms = t_ms + BARO_PERIOD_MS;
            let (pos, _) = self.truth_at(self.t - BARO_DELAY_S);
            self.ekf.push_baro(BaroSample { timestamp_ms: t_ms, altitude: -pos.z });
        }
        if self.mag_on && t_ms >= self.next_mag_ms {
            self.next_mag_ms = t_ms + MAG_PERIOD_MS;
            let yaw = self.yaw_at(self.t - MAG_DELAY_S);
            let mag = self.mag_sample(t_ms, yaw);
            self.ekf.push_mag(mag);
        }
        if self.tas_on && t_ms >= self.next_tas_ms {
            self.next_tas_ms = t_ms + TAS_PERIOD_MS;
            let (_, vel) = self.truth_at(self.t - TAS_DELAY_S);
            self.ekf.push_airspeed(AirspeedSample {
                timestamp_ms: t_ms,
                airspeed: vel.norm(),
                eas2tas: 1.0,
            });
        }

        self.ekf.update(&ImuSample {
            timestamp_ms: t_ms,
            dt: DT,
            accel1: (accel_along, self.speed * yaw_rate, -G),
            accel2: None,
            gyro: (0.0, 0.0, yaw_rate),
        });
    }

    fn run(&mut self, seconds: f64, yaw_rate: f64, accel_along: f64) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            self.step(yaw_rate, accel_along);
        }
    }

    /// Gap with no IMU samples: the truth keeps moving, then one stalled
    /// sample covering the whole gap is delivered together with fresh GPS
    /// and baro data.
    fn stall(&mut self, seconds: f64) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            self.t += DT;
            let vel =
                Vector3::new(self.speed * self.yaw.cos(), self.speed * self.yaw.sin(), 0.0);
            self.pos += vel * DT;
            self.hist.push_back((self.t, self.pos, vel));
        }
        let t_ms = (self.t * 1000.0).round() as u64;
        let (pos, vel) = self.truth_at(self.t - GPS_DELAY_S);
        let fix = self.gps_sample(t_ms, pos, vel);
        self.ekf.push_gps(fix);
        self.ekf.push_baro(BaroSample { timestamp_ms: t_ms, altitude: -self.pos.z });
        self.next_gps_ms = t_ms + GPS_PERIOD_MS;
        self.next_baro_ms = t_ms + BARO_PERIOD_MS;
        self.ekf.update(&ImuSample {
            timestamp_ms: t_ms,
            dt: seconds,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        });
    }
}

// ─── Scenario A: static bootstrap ────────────────────────────────────────────

#[test]
fn static_bootstrap_levels_and_holds_zero() {
    let mut ekf = NavEkf::new(EkfConfig::default());
    ekf.set_home(HOME);
    ekf.set_compass_use(true);
    ekf.set_vehicle_status(false, true); // disarmed: static mode

    ekf.push_mag(MagSample {
        timestamp_ms: 1,
        field: (300.0, 0.0, 500.0),
        offsets: (0.0, 0.0, 0.0),
    });
    ekf.push_baro(BaroSample { timestamp_ms: 1, altitude: 0.0 });
    let imu = ImuSample {
        timestamp_ms: 0,
        dt: DT,
        accel1: (0.0, 0.0, -G),
        accel2: None,
        gyro: (0.0, 0.0, 0.0),
    };
    ekf.initialise_filter_bootstrap(&imu);

    for k in 1..=100u64 {
        let t_ms = (k as f64 * DT * 1000.0).round() as u64;
        if t_ms % MAG_PERIOD_MS < 3 {
            ekf.push_mag(MagSample {
                timestamp_ms: t_ms,
                field: (300.0, 0.0, 500.0),
                offsets: (0.0, 0.0, 0.0),
            });
        }
        ekf.update(&ImuSample { timestamp_ms: t_ms, ..imu });
    }

    let (roll, pitch, yaw) = ekf.euler_angles();
    let one_deg = 1.0_f64.to_radians();
    assert!(roll.abs() < one_deg, "roll {roll}");
    assert!(pitch.abs() < one_deg, "pitch {pitch}");
    assert!(yaw.abs() < one_deg, "yaw {yaw}");
    assert!(ekf.pos_ned().norm() < 0.05, "position {:?}", ekf.pos_ned());
    assert!(ekf.vel_ned().norm() < 0.05, "velocity {:?}", ekf.vel_ned());
}

// ─── Scenario B: pure yaw rotation ───────────────────────────────────────────

#[test]
fn pure_yaw_rotation_tracks_integrated_rate() {
    let mut ekf = NavEkf::new(EkfConfig::default());
    ekf.set_home(HOME);
    ekf.set_compass_use(true);
    ekf.set_vehicle_status(false, true);

    let field_at = |yaw: f64| {
        (
            (yaw.cos() * 0.3) * 1000.0,
            (-yaw.sin() * 0.3) * 1000.0,
            0.5 * 1000.0,
        )
    };
    ekf.push_mag(MagSample { timestamp_ms: 1, field: field_at(0.0), offsets: (0.0, 0.0, 0.0) });
    ekf.push_baro(BaroSample { timestamp_ms: 1, altitude: 0.0 });
    ekf.initialise_filter_bootstrap(&ImuSample {
        timestamp_ms: 0,
        dt: DT,
        accel1: (0.0, 0.0, -G),
        accel2: None,
        gyro: (0.0, 0.0, 0.0),
    });

    // settle at rest for one second
    let mut t = 0.0_f64;
    for _ in 0..400 {
        t += DT;
        let t_ms = (t * 1000.0).round() as u64;
        if t_ms % MAG_PERIOD_MS < 3 {
            ekf.push_mag(MagSample {
                timestamp_ms: t_ms,
                field: field_at(0.0),
                offsets: (0.0, 0.0, 0.0),
            });
        }
        ekf.update(&ImuSample {
            timestamp_ms: t_ms,
            dt: DT,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        });
    }
    let (_, _, yaw_start) = ekf.euler_angles();

    // two seconds at 0.1 rad/s about Z with the field rotating to match
    let mut yaw_true = 0.0_f64;
    for _ in 0..800 {
        t += DT;
        yaw_true += 0.1 * DT;
        let t_ms = (t * 1000.0).round() as u64;
        if t_ms % MAG_PERIOD_MS < 3 {
            ekf.push_mag(MagSample {
                timestamp_ms: t_ms,
                field: field_at(yaw_true),
                offsets: (0.0, 0.0, 0.0),
            });
        }
        ekf.update(&ImuSample {
            timestamp_ms: t_ms,
            dt: DT,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (0.0, 0.0, 0.1),
        });
    }

    let (roll, pitch, yaw_end) = ekf.euler_angles();
    let yaw_change = yaw_end - yaw_start;
    assert!(
        (yaw_change - 0.2).abs() < 0.002,
        "yaw change {yaw_change}, expected 0.2 +-1%"
    );
    assert!(roll.abs() < 0.01, "roll {roll}");
    assert!(pitch.abs() < 0.01, "pitch {pitch}");
    assert!(
        ekf.gyro_bias().norm() < 0.002,
        "gyro bias {:?}",
        ekf.gyro_bias()
    );
}

// ─── Scenario C: straight and level cruise ───────────────────────────────────

#[test]
fn straight_and_level_cruise_tracks_position_and_wind() {
    // copter profile with an airspeed sensor so the wind states are active
    let mut sim = FlightSim::new(VehicleKind::Copter, true, std::f64::consts::FRAC_PI_2);
    sim.run(2.0, 0.0, 0.0); // settle
    sim.run(10.0, 0.0, 2.0); // accelerate east to 20 m/s
    sim.run(30.0, 0.0, 0.0); // cruise

    let pos_err = sim.ekf.pos_ned() - sim.pos;
    assert!(
        pos_err.norm() < 2.0,
        "position error {:?} ({:?} vs truth {:?})",
        pos_err.norm(),
        sim.ekf.pos_ned(),
        sim.pos
    );
    let vel_err = sim.ekf.vel_ned() - Vector3::new(0.0, 20.0, 0.0);
    assert!(vel_err.norm() < 0.5, "velocity error {:?}", vel_err);
    assert!(sim.ekf.wind().norm() < 1.0, "wind {:?}", sim.ekf.wind());
    assert!(sim.ekf.healthy());
}

// ─── Scenario D: GPS glitch ──────────────────────────────────────────────────

#[test]
fn gps_glitch_is_gated_and_offset_decays() {
    let mut sim = FlightSim::new(VehicleKind::Copter, true, std::f64::consts::FRAC_PI_2);
    sim.run(2.0, 0.0, 0.0);
    sim.run(10.0, 0.0, 2.0);
    sim.run(10.0, 0.0, 0.0);

    // one second of GPS position jumped 25 m north
    sim.gps_err = Vector2::new(25.0, 0.0);
    let steps = (1.0 / DT) as usize;
    for _ in 0..steps {
        sim.step(0.0, 0.0);
        let err = sim.ekf.pos_ned() - sim.pos;
        assert!(
            err.norm() < 10.0,
            "glitched GPS dragged the solution by {:.1} m",
            err.norm()
        );
        let (_, _, _, _, _, offset) = sim.ekf.variances();
        assert!(offset.norm() <= 25.5, "offset {:?}", offset);
    }
    sim.gps_err = Vector2::zeros();

    // within 25 s the offset has decayed and the solution tracks again
    sim.run(25.0, 0.0, 0.0);
    let (_, _, _, _, _, offset) = sim.ekf.variances();
    assert!(offset.norm() < 1.0, "offset failed to decay: {:?}", offset);
    let err = sim.ekf.pos_ned() - sim.pos;
    assert!(err.norm() < 5.0, "post-glitch position error {:.1} m", err.norm());
}

// ─── Scenario E: compass timeout on a fixed wing ─────────────────────────────

#[test]
fn compass_timeout_latches_failed_and_yaw_survives_a_turn() {
    let mut sim = FlightSim::new(VehicleKind::Plane, true, 0.0);
    sim.run(2.0, 0.0, 0.0);
    sim.run(10.0, 0.0, 2.0); // 20 m/s north
    sim.run(5.0, 0.0, 0.0);
    assert!(!sim.ekf.mag_timeout());

    // compass goes silent
    sim.mag_on = false;
    let silence_start = sim.t;
    let mut timeout_at = None;
    while sim.t - silence_start < 11.0 {
        sim.step(0.0, 0.0);
        if timeout_at.is_none() && sim.ekf.mag_timeout() {
            timeout_at = Some(sim.t - silence_start);
        }
    }
    let timeout_at = timeout_at.expect("mag timeout never declared");
    assert!(
        (9.8..=10.2).contains(&timeout_at),
        "mag timeout at {timeout_at:.2} s, expected 10 s +-0.1"
    );
    // fly-forward vehicles fail the compass permanently
    assert!(sim.ekf.mag_failed());

    // 90 degree right turn at 0.1 rad/s, then settle
    let turn_time = std::f64::consts::FRAC_PI_2 / 0.1;
    sim.run(turn_time, 0.1, 0.0);
    sim.run(3.0, 0.0, 0.0);

    let (_, _, yaw) = sim.ekf.euler_angles();
    let yaw_err = (yaw - sim.yaw).abs();
    assert!(
        yaw_err < 3.0_f64.to_radians(),
        "yaw error {:.2} deg after 90 deg heading change",
        yaw_err.to_degrees()
    );
}

// ─── Scenario F: IMU stall ───────────────────────────────────────────────────

#[test]
fn imu_stall_resets_from_fresh_measurements() {
    let mut sim = FlightSim::new(VehicleKind::Copter, false, 0.0);
    sim.run(2.0, 0.0, 0.0);
    sim.run(5.0, 0.0, 2.0); // 10 m/s north
    sim.run(5.0, 0.0, 0.0);

    sim.stall(0.5);

    // healthy within one second of resuming
    sim.run(1.0, 0.0, 0.0);
    assert!(sim.ekf.healthy(), "filter unhealthy after stall recovery");
    let err = sim.ekf.pos_ned() - sim.pos;
    assert!(err.norm() < 10.0, "position error {:.1} m after stall", err.norm());
    let vel_err = sim.ekf.vel_ned() - Vector3::new(10.0, 0.0, 0.0);
    assert!(vel_err.norm() < 2.0, "velocity error {:?} after stall", vel_err);
}

// ─── Invariants under randomized inputs ──────────────────────────────────────

#[test]
fn invariants_hold_under_randomized_inputs() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ekf = NavEkf::new(EkfConfig::default());
    ekf.set_home(HOME);
    ekf.set_compass_use(true);
    ekf.set_vehicle_status(true, true);

    ekf.push_mag(MagSample {
        timestamp_ms: 1,
        field: (300.0, 0.0, 500.0),
        offsets: (0.0, 0.0, 0.0),
    });
    ekf.push_baro(BaroSample { timestamp_ms: 1, altitude: 0.0 });
    ekf.push_gps(GpsFix {
        timestamp_ms: 1,
        fix_3d: true,
        latitude: HOME.latitude,
        longitude: HOME.longitude,
        vel_ned: (0.0, 0.0, 0.0),
        num_sats: 8,
        have_vertical_velocity: true,
    });
    ekf.initialise_filter_bootstrap(&ImuSample {
        timestamp_ms: 0,
        dt: DT,
        accel1: (0.0, 0.0, -G),
        accel2: None,
        gyro: (0.0, 0.0, 0.0),
    });

    for k in 1..4000u64 {
        let t_ms = (k as f64 * DT * 1000.0).round() as u64;
        let n = |rng: &mut StdRng, s: f64| rng.gen_range(-s..s);
        if t_ms % GPS_PERIOD_MS < 3 {
            ekf.push_gps(GpsFix {
                timestamp_ms: t_ms,
                fix_3d: true,
                latitude: HOME.latitude,
                longitude: HOME.longitude,
                vel_ned: (n(&mut rng, 0.2), n(&mut rng, 0.2), n(&mut rng, 0.2)),
                num_sats: 8,
                have_vertical_velocity: true,
            });
        }
        if t_ms % BARO_PERIOD_MS < 3 {
            ekf.push_baro(BaroSample { timestamp_ms: t_ms, altitude: n(&mut rng, 0.3) });
            ekf.push_mag(MagSample {
                timestamp_ms: t_ms,
                field: (300.0 + n(&mut rng, 5.0), n(&mut rng, 5.0), 500.0 + n(&mut rng, 5.0)),
                offsets: (0.0, 0.0, 0.0),
            });
        }
        ekf.update(&ImuSample {
            timestamp_ms: t_ms,
            dt: DT,
            accel1: (n(&mut rng, 0.3), n(&mut rng, 0.3), -G + n(&mut rng, 0.3)),
            accel2: Some((n(&mut rng, 0.3), n(&mut rng, 0.3), -G + n(&mut rng, 0.3))),
            gyro: (n(&mut rng, 0.2), n(&mut rng, 0.2), n(&mut rng, 0.2)),
        });

        // 1: quaternion stays unit norm
        assert!(
            (ekf.quaternion().length() - 1.0).abs() < 1e-6,
            "quaternion norm drifted at step {k}"
        );

        // 2: covariance stays symmetric
        let p = ekf.covariance();
        for i in 0..22 {
            for j in 0..22 {
                assert!(
                    (p[i][j] - p[j][i]).abs() < 1e-9,
                    "P asymmetric at ({i},{j}) step {k}"
                );
            }
        }

        // 3: diagonals stay inside the per-group clamps
        for i in 0..4 {
            assert!((0.0..=1.0).contains(&p[i][i]));
        }
        for i in 4..7 {
            assert!((0.0..=1.0e3).contains(&p[i][i]));
        }
        for i in 7..10 {
            assert!((0.0..=1.0e6).contains(&p[i][i]));
        }
        let gyro_bias_cap = (0.175 * DT) * (0.175 * DT);
        for i in 10..13 {
            assert!((0.0..=gyro_bias_cap).contains(&p[i][i]));
        }
        assert!((0.0..=(10.0 * DT) * (10.0 * DT)).contains(&p[13][13]));
        for i in 14..16 {
            assert!((0.0..=1.0e3).contains(&p[i][i]));
        }
        for i in 16..19 {
            assert!((0.0..=1.0e3).contains(&p[i][i]));
        }
        for i in 19..22 {
            assert!((0.0..=1.0).contains(&p[i][i]));
        }
    }
}

/// Invariant 4: with zero-mean inertial noise and no measurements at all,
/// drift stays within the worst-case bias envelope.
#[test]
fn dead_reckoning_drift_is_bounded() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut ekf = NavEkf::new(EkfConfig::default());
    ekf.set_home(HOME);
    ekf.set_vehicle_status(true, true);
    ekf.initialise_filter_bootstrap(&ImuSample {
        timestamp_ms: 0,
        dt: DT,
        accel1: (0.0, 0.0, -G),
        accel2: None,
        gyro: (0.0, 0.0, 0.0),
    });

    let seconds = 10.0;
    for k in 1..(seconds / DT) as u64 {
        let t_ms = (k as f64 * DT * 1000.0).round() as u64;
        let n = |rng: &mut StdRng, s: f64| rng.gen_range(-s..s);
        ekf.update(&ImuSample {
            timestamp_ms: t_ms,
            dt: DT,
            accel1: (n(&mut rng, 0.05), n(&mut rng, 0.05), -G + n(&mut rng, 0.05)),
            accel2: None,
            gyro: (n(&mut rng, 0.002), n(&mut rng, 0.002), n(&mut rng, 0.002)),
        });
    }

    // worst-case accel bias 0.1 m/s^2 over 10 s: 5 m plus noise margin
    assert!(
        ekf.vel_ned().norm() < 5.0,
        "velocity drift {:?}",
        ekf.vel_ned()
    );
    assert!(
        ekf.pos_ned().norm() < 100.0,
        "position drift {:?}",
        ekf.pos_ned()
    );
}

/// Invariant 5: after a step change in reported position, the position
/// innovation shrinks as the filter converges.
#[test]
fn position_innovation_decreases_after_step() {
    let mut sim = FlightSim::new(VehicleKind::Copter, false, 0.0);
    sim.run(5.0, 0.0, 0.0);

    // persistent 8 m offset, below the glitch radius
    sim.gps_err = Vector2::new(8.0, 0.0);
    sim.run(4.0, 0.0, 0.0);
    let (_, pos_innov_early, _, _) = sim.ekf.innovations();
    sim.run(16.0, 0.0, 0.0);
    let (_, pos_innov_late, _, _) = sim.ekf.innovations();

    let early = (pos_innov_early.x.powi(2) + pos_innov_early.y.powi(2)).sqrt();
    let late = (pos_innov_late.x.powi(2) + pos_innov_late.y.powi(2)).sqrt();
    assert!(
        late < early.max(0.5),
        "position innovation grew: early {early:.2} late {late:.2}"
    );
    assert!(late < 1.5, "innovation never converged: {late:.2}");
}

/// Invariant 6: a delayed measurement stream with a matching replay window
/// reaches the same posterior as an undelayed stream with a zero window.
#[test]
fn measurement_delay_round_trip_matches_synchronous() {
    // a perfect gyro senses earth rotation; feeding it keeps the stationary
    // truth exact so the two runs differ only in their replay windows
    const EARTH_RATE: f64 = 7.2921e-5;
    let lat = HOME.latitude.to_radians();
    let earth_gyro = (EARTH_RATE * lat.cos(), 0.0, -EARTH_RATE * lat.sin());

    let run = |delayed: bool| -> Vector3<f64> {
        let mut config = EkfConfig::default();
        if !delayed {
            config.msec_vel_delay = 0;
            config.msec_pos_delay = 0;
            config.msec_hgt_delay = 0;
        }
        let mut ekf = NavEkf::new(config);
        ekf.set_home(HOME);
        ekf.set_vehicle_status(true, true);
        ekf.push_baro(BaroSample { timestamp_ms: 1, altitude: 0.0 });
        ekf.push_gps(GpsFix {
            timestamp_ms: 1,
            fix_3d: true,
            latitude: HOME.latitude,
            longitude: HOME.longitude,
            vel_ned: (0.0, 0.0, 0.0),
            num_sats: 8,
            have_vertical_velocity: true,
        });
        ekf.initialise_filter_bootstrap(&ImuSample {
            timestamp_ms: 0,
            dt: DT,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: earth_gyro,
        });
        for k in 1..(8.0 / DT) as u64 {
            let t_ms = (k as f64 * DT * 1000.0).round() as u64;
            if t_ms % GPS_PERIOD_MS < 3 {
                ekf.push_gps(GpsFix {
                    timestamp_ms: t_ms,
                    fix_3d: true,
                    latitude: HOME.latitude,
                    longitude: HOME.longitude,
                    vel_ned: (0.0, 0.0, 0.0),
                    num_sats: 8,
                    have_vertical_velocity: true,
                });
            }
            if t_ms % BARO_PERIOD_MS < 3 {
                ekf.push_baro(BaroSample { timestamp_ms: t_ms, altitude: 0.0 });
            }
            ekf.update(&ImuSample {
                timestamp_ms: t_ms,
                dt: DT,
                accel1: (0.0, 0.0, -G),
                accel2: None,
                gyro: earth_gyro,
            });
        }
        ekf.pos_ned()
    };

    let delayed = run(true);
    let synchronous = run(false);
    assert!(
        (delayed - synchronous).norm() < 1e-3,
        "delayed {delayed:?} vs synchronous {synchronous:?}"
    );
}

// ─── Boundary behaviour ──────────────────────────────────────────────────────

#[test]
fn extreme_rotation_keeps_quaternion_bounded() {
    let mut ekf = NavEkf::new(EkfConfig::default());
    ekf.set_home(HOME);
    ekf.set_vehicle_status(true, true);
    ekf.initialise_filter_bootstrap(&ImuSample {
        timestamp_ms: 0,
        dt: DT,
        accel1: (0.0, 0.0, -G),
        accel2: None,
        gyro: (0.0, 0.0, 0.0),
    });
    for k in 1..200u64 {
        ekf.update(&ImuSample {
            timestamp_ms: k * 3,
            dt: DT,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (400.0, -380.0, 500.0),
        });
        let q = ekf.quaternion().0;
        for c in q {
            assert!(c.is_finite() && (-1.0..=1.0).contains(&c), "quat {q:?}");
        }
    }
}

#[test]
fn oversized_dt_is_treated_as_a_stall_not_a_blowup() {
    let mut sim = FlightSim::new(VehicleKind::Copter, false, 0.0);
    sim.run(2.0, 0.0, 0.0);
    // dt beyond the 1 s clamp arrives as a stalled sample
    let t_ms = (sim.t * 1000.0).round() as u64 + 5000;
    sim.ekf.push_gps(GpsFix {
        timestamp_ms: t_ms,
        fix_3d: true,
        latitude: HOME.latitude,
        longitude: HOME.longitude,
        vel_ned: (0.0, 0.0, 0.0),
        num_sats: 8,
        have_vertical_velocity: true,
    });
    sim.ekf.update(&ImuSample {
        timestamp_ms: t_ms,
        dt: 5.0,
        accel1: (0.0, 0.0, -G),
        accel2: None,
        gyro: (0.0, 0.0, 0.0),
    });
    assert!(sim.ekf.pos_ned().norm().is_finite());
    assert!(sim.ekf.vel_ned().norm() < 1.0);
}
