use serde::{Deserialize, Serialize};

/// Vehicle profile the filter is tuned for. Fixed-wing vehicles fly forward
/// and are assumed to hold near-zero sideslip, which enables the synthetic
/// sideslip pseudo-measurement and GPS yaw alignment after compass failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Copter,
    Rover,
    Plane,
}

impl VehicleKind {
    pub fn fly_forward(self) -> bool {
        matches!(self, VehicleKind::Plane)
    }
}

/// How the in-flight magnetometer field-state calibration is triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagCalMode {
    /// Calibrate once flying speed and altitude indicate we are airborne
    SpeedAndHeight,
    /// Calibrate based on manoeuvre level
    Manoeuvre,
    /// Never calibrate field states in flight
    Never,
}

/// GPS velocity usage: 3-D velocity, 2-D velocity, or position only.
pub const GPS_MODE_VEL3D: u8 = 0;
pub const GPS_MODE_VEL2D: u8 = 1;
pub const GPS_MODE_POS_ONLY: u8 = 2;

/// Filter tuning. All noise values are 1-sigma RMS in SI units unless noted;
/// gate sizes are in standard deviations. Values are clamped to their valid
/// ranges where they are consumed, so out-of-range settings degrade to the
/// nearest legal value rather than destabilising the filter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EkfConfig {
    pub vehicle: VehicleKind,

    // ── Measurement noise (RMS) ──
    /// GPS horizontal velocity noise (m/s)
    pub gps_horiz_vel_noise: f64,
    /// GPS vertical velocity noise (m/s)
    pub gps_vert_vel_noise: f64,
    /// GPS horizontal position noise (m)
    pub gps_horiz_pos_noise: f64,
    /// Barometric altitude noise (m)
    pub baro_alt_noise: f64,
    /// Magnetometer noise (Gauss)
    pub mag_noise: f64,
    /// Equivalent airspeed noise (m/s)
    pub eas_noise: f64,

    // ── Process noise ──
    /// Wind velocity process noise (m/s^2)
    pub wind_vel_process_noise: f64,
    /// Scale factor applied to wind process noise from height rate
    pub wind_var_hgt_rate_scale: f64,
    /// Rate gyro noise (rad/s)
    pub gyro_process_noise: f64,
    /// Accelerometer noise (m/s^2)
    pub accel_process_noise: f64,
    /// Rate gyro bias process noise (rad/s)
    pub gyro_bias_process_noise: f64,
    /// Z accelerometer bias process noise (m/s^2)
    pub accel_bias_process_noise: f64,
    /// Earth magnetic field process noise (Gauss/s)
    pub mag_earth_process_noise: f64,
    /// Body magnetic field process noise (Gauss/s)
    pub mag_body_process_noise: f64,

    // ── Measurement delays (ms), each bounded to [0, 500] on use ──
    pub msec_vel_delay: u32,
    pub msec_pos_delay: u32,
    pub msec_hgt_delay: u32,
    pub msec_mag_delay: u32,
    pub msec_tas_delay: u32,

    /// GPS velocity usage: 0 = 3-D velocity, 1 = 2-D velocity, 2 = none
    pub gps_fusion_mode: u8,

    // ── Innovation consistency gates (standard deviations) ──
    pub gps_vel_innov_gate: f64,
    pub gps_pos_innov_gate: f64,
    pub hgt_innov_gate: f64,
    pub mag_innov_gate: f64,
    pub tas_innov_gate: f64,

    pub mag_cal: MagCalMode,

    // ── GPS glitch protection ──
    /// Maximum mismatch between predicted and GPS-implied horizontal
    /// acceleration before a position sample is rejected (cm/s^2)
    pub glitch_accel_max: f64,
    /// Radius (m) beyond which the long-term glitch offset engages
    pub glitch_radius_max: f64,

    /// Force airspeed and sideslip fusion to run on the frame their data
    /// arrives instead of being deferred off magnetometer frames
    pub fuse_me_now: bool,
}

impl EkfConfig {
    pub fn for_vehicle(vehicle: VehicleKind) -> Self {
        match vehicle {
            VehicleKind::Copter => EkfConfig {
                vehicle,
                gps_horiz_vel_noise: 0.5,
                gps_vert_vel_noise: 0.7,
                gps_horiz_pos_noise: 0.5,
                baro_alt_noise: 0.1,
                mag_noise: 0.05,
                eas_noise: 1.4,
                wind_vel_process_noise: 0.1,
                wind_var_hgt_rate_scale: 0.5,
                gyro_process_noise: 0.015,
                accel_process_noise: 0.25,
                gyro_bias_process_noise: 1.0e-6,
                accel_bias_process_noise: 1.0e-4,
                mag_earth_process_noise: 3.0e-4,
                mag_body_process_noise: 3.0e-4,
                msec_vel_delay: 220,
                msec_pos_delay: 220,
                msec_hgt_delay: 60,
                msec_mag_delay: 40,
                msec_tas_delay: 240,
                gps_fusion_mode: GPS_MODE_VEL3D,
                gps_vel_innov_gate: 6.0,
                gps_pos_innov_gate: 10.0,
                hgt_innov_gate: 10.0,
                mag_innov_gate: 3.0,
                tas_innov_gate: 10.0,
                mag_cal: MagCalMode::Manoeuvre,
                glitch_accel_max: 150.0,
                glitch_radius_max: 15.0,
                fuse_me_now: false,
            },
            VehicleKind::Rover => EkfConfig {
                accel_bias_process_noise: 2.0e-4,
                ..EkfConfig::for_vehicle(VehicleKind::Copter)
            },
            VehicleKind::Plane => EkfConfig {
                gps_horiz_vel_noise: 0.3,
                gps_vert_vel_noise: 0.5,
                accel_bias_process_noise: 2.0e-4,
                hgt_innov_gate: 20.0,
                mag_cal: MagCalMode::SpeedAndHeight,
                ..EkfConfig::for_vehicle(VehicleKind::Copter)
            },
        }
        .with_vehicle(vehicle)
    }

    fn with_vehicle(mut self, vehicle: VehicleKind) -> Self {
        self.vehicle = vehicle;
        self
    }
}

impl Default for EkfConfig {
    fn default() -> Self {
        EkfConfig::for_vehicle(VehicleKind::Copter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_profile_overrides() {
        let cfg = EkfConfig::for_vehicle(VehicleKind::Plane);
        assert_eq!(cfg.vehicle, VehicleKind::Plane);
        assert_eq!(cfg.hgt_innov_gate, 20.0);
        assert_eq!(cfg.mag_cal, MagCalMode::SpeedAndHeight);
        assert!(cfg.vehicle.fly_forward());
    }

    #[test]
    fn copter_profile_defaults() {
        let cfg = EkfConfig::default();
        assert_eq!(cfg.gps_horiz_vel_noise, 0.5);
        assert_eq!(cfg.hgt_innov_gate, 10.0);
        assert!(!cfg.vehicle.fly_forward());
    }
}
