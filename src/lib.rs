// nav_ekf_rs — navigation estimator for a small-vehicle autopilot.
//
// The core is a 22-state extended Kalman filter that fuses strapdown inertial
// data with GPS, barometric height, magnetometer, true airspeed and a
// synthetic sideslip pseudo-measurement. Everything in `ekf/` is a pure
// computation layer: no I/O, no async runtime, no clock reads. Samples go in,
// state estimates and fault flags come out, which means the whole filter can
// be unit-tested with recorded or synthetic data and driven by whatever
// scheduler the host provides.

pub mod baro;
pub mod config;
pub mod ekf;
pub mod maths;
pub mod outputs;
pub mod types;

pub use config::{EkfConfig, MagCalMode, VehicleKind};
pub use ekf::NavEkf;
pub use outputs::{FaultStatus, NavSnapshot};
pub use types::{
    AirspeedSample, BaroSample, GeoPosition, GpsFix, ImuSample, MagSample,
};
