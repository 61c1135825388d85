use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One IMU sample: two accelerometers, an averaged gyro, and the integration
/// interval reported by the inertial driver. Timestamps are a monotonic
/// millisecond clock shared by every sensor feeding the filter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ImuSample {
    pub timestamp_ms: u64,
    /// IMU integration interval in seconds (clamped to [0.001, 1.0] on ingest)
    pub dt: f64,
    pub accel1: (f64, f64, f64),
    /// Second accelerometer; `None` falls back to `accel1`
    pub accel2: Option<(f64, f64, f64)>,
    pub gyro: (f64, f64, f64),
}

impl ImuSample {
    pub fn accel1_vec(&self) -> Vector3<f64> {
        Vector3::new(self.accel1.0, self.accel1.1, self.accel1.2)
    }

    pub fn accel2_vec(&self) -> Vector3<f64> {
        let a = self.accel2.unwrap_or(self.accel1);
        Vector3::new(a.0, a.1, a.2)
    }

    pub fn gyro_vec(&self) -> Vector3<f64> {
        Vector3::new(self.gyro.0, self.gyro.1, self.gyro.2)
    }
}

/// A GPS fix as delivered by the receiver driver. `timestamp_ms` is the
/// receiver message time; a fix is only consumed when it advances and
/// `fix_3d` is set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GpsFix {
    pub timestamp_ms: u64,
    pub fix_3d: bool,
    pub latitude: f64,
    pub longitude: f64,
    /// NED velocity (m/s)
    pub vel_ned: (f64, f64, f64),
    pub num_sats: u8,
    pub have_vertical_velocity: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BaroSample {
    pub timestamp_ms: u64,
    /// Altitude above the calibration datum (m)
    pub altitude: f64,
}

/// Magnetometer reading in device units together with the device's hard-iron
/// offsets. Scaling to Gauss-sized numbers happens on ingest.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MagSample {
    pub timestamp_ms: u64,
    pub field: (f64, f64, f64),
    pub offsets: (f64, f64, f64),
}

impl MagSample {
    pub fn field_vec(&self) -> Vector3<f64> {
        Vector3::new(self.field.0, self.field.1, self.field.2)
    }

    pub fn offsets_vec(&self) -> Vector3<f64> {
        Vector3::new(self.offsets.0, self.offsets.1, self.offsets.2)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AirspeedSample {
    pub timestamp_ms: u64,
    /// Indicated (equivalent) airspeed (m/s)
    pub airspeed: f64,
    /// Density ratio factor converting EAS to TAS
    pub eas2tas: f64,
}

/// Geodetic position used for the home reference and the LLH output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude (m, up positive)
    pub altitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accel2_falls_back_to_accel1() {
        let imu = ImuSample {
            timestamp_ms: 0,
            dt: 0.0025,
            accel1: (0.1, -0.2, -9.8),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        };
        assert_eq!(imu.accel2_vec(), imu.accel1_vec());
    }
}
