use serde::{Deserialize, Serialize};

/// Per-fusion fault flags, also exposed as the packed bitmap the vehicle
/// code consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultStatus {
    /// divergence detected via gyro bias growth
    pub diverged: bool,
    /// divergence detected by large covariances
    pub large_covariance: bool,
    /// badly conditioned X magnetometer fusion
    pub bad_xmag: bool,
    /// badly conditioned Y magnetometer fusion
    pub bad_ymag: bool,
    /// badly conditioned Z magnetometer fusion
    pub bad_zmag: bool,
    /// badly conditioned airspeed fusion
    pub bad_airspeed: bool,
    /// badly conditioned synthetic sideslip fusion
    pub bad_sideslip: bool,
}

impl FaultStatus {
    pub fn bitmap(&self) -> u8 {
        (self.diverged as u8)
            | (self.large_covariance as u8) << 1
            | (self.bad_xmag as u8) << 2
            | (self.bad_ymag as u8) << 3
            | (self.bad_zmag as u8) << 4
            | (self.bad_airspeed as u8) << 5
            | (self.bad_sideslip as u8) << 6
    }
}

/// One-call summary of the navigation solution, convenient for telemetry
/// and session recording.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NavSnapshot {
    pub timestamp_ms: u64,
    pub healthy: bool,
    /// Euler attitude with the AHRS trim removed (rad)
    pub euler: (f64, f64, f64),
    pub quaternion: (f64, f64, f64, f64),
    /// NED velocity (m/s)
    pub velocity_ned: (f64, f64, f64),
    /// NED position relative to home (m)
    pub position_ned: (f64, f64, f64),
    /// Geodetic fix derived from the home offset
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Gyro bias (rad/s)
    pub gyro_bias: (f64, f64, f64),
    /// Z accel bias per IMU (m/s^2)
    pub accel_zbias: (f64, f64),
    /// Weighting of IMU1 in the delta velocity blend (0..1)
    pub imu1_weighting: f64,
    /// NE wind estimate (m/s)
    pub wind: (f64, f64),
    /// Earth magnetic field estimate, sensor units
    pub mag_ned: (f64, f64, f64),
    /// Body magnetic field estimate, sensor units
    pub mag_xyz: (f64, f64, f64),
    /// Innovation consistency test ratios (sqrt), vel/pos/hgt/mag/tas
    pub vel_test_ratio: f64,
    pub pos_test_ratio: f64,
    pub hgt_test_ratio: f64,
    pub mag_test_ratio: (f64, f64, f64),
    pub tas_test_ratio: f64,
    /// Offset currently applied to GPS position measurements (m)
    pub gps_glitch_offset: (f64, f64),
    pub fault_bitmap: u8,
    pub on_ground: bool,
    pub static_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_packs_in_documented_order() {
        let faults = FaultStatus {
            diverged: true,
            bad_xmag: true,
            bad_sideslip: true,
            ..FaultStatus::default()
        };
        assert_eq!(faults.bitmap(), 0b0100_0101);
        assert_eq!(FaultStatus::default().bitmap(), 0);
    }
}
