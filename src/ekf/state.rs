// Filter state storage.
//
// The covariance maths indexes states numerically while the strapdown and
// fusion logic wants named fields. Both views sit over a single backing
// array so they can never disagree: `Index`/`IndexMut` give the numeric
// view used by the gain and covariance loops, the inherent methods give the
// named view.
//
// Layout:
//   0..3   attitude quaternion (w, x, y, z)
//   4..6   NED velocity, blended IMU (m/s)
//   7..9   NED position (m)
//   10..12 integrated gyro bias over one IMU step (rad)
//   13     integrated IMU1 Z accel bias (m/s)
//   14..15 NE wind velocity (m/s)
//   16..18 earth magnetic field, NED (Gauss)
//   19..21 body magnetic field bias (Gauss)
//   22     integrated IMU2 Z accel bias (m/s)
//   23..25 NED velocity from IMU1 only
//   26     down position from IMU1 only
//   27..29 NED velocity from IMU2 only
//   30     down position from IMU2 only
//
// Indices 0..=21 are covaried; the rest ride along for the dual-IMU
// blending logic.

use std::ops::{Index, IndexMut};

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::maths::Quat;

pub const NUM_STATES: usize = 31;
pub const NUM_COVARIED: usize = 22;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StateVector(#[serde(with = "serde_arrays")] [f64; NUM_STATES]);

// serde does not derive for arrays this long; a local shim keeps the state
// snapshot serialisable for session recording.
mod serde_arrays {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &[f64; super::NUM_STATES], s: S) -> Result<S::Ok, S::Error> {
        v.as_slice().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[f64; super::NUM_STATES], D::Error> {
        let v = Vec::<f64>::deserialize(d)?;
        v.try_into()
            .map_err(|_| serde::de::Error::custom("state vector length mismatch"))
    }
}

impl Default for StateVector {
    fn default() -> Self {
        let mut s = StateVector([0.0; NUM_STATES]);
        s.set_quat(Quat::default());
        s
    }
}

impl Index<usize> for StateVector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for StateVector {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl StateVector {
    pub fn quat(&self) -> Quat {
        Quat([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn set_quat(&mut self, q: Quat) {
        self.0[0..4].copy_from_slice(&q.0);
    }

    pub fn normalize_quat(&mut self) {
        let mut q = self.quat();
        q.normalize();
        self.set_quat(q);
    }

    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.0[4], self.0[5], self.0[6])
    }

    pub fn set_velocity(&mut self, v: Vector3<f64>) {
        self.0[4] = v.x;
        self.0[5] = v.y;
        self.0[6] = v.z;
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.0[7], self.0[8], self.0[9])
    }

    pub fn set_position(&mut self, p: Vector3<f64>) {
        self.0[7] = p.x;
        self.0[8] = p.y;
        self.0[9] = p.z;
    }

    pub fn gyro_bias(&self) -> Vector3<f64> {
        Vector3::new(self.0[10], self.0[11], self.0[12])
    }

    pub fn set_gyro_bias(&mut self, b: Vector3<f64>) {
        self.0[10] = b.x;
        self.0[11] = b.y;
        self.0[12] = b.z;
    }

    pub fn accel_zbias1(&self) -> f64 {
        self.0[13]
    }

    pub fn set_accel_zbias1(&mut self, b: f64) {
        self.0[13] = b;
    }

    pub fn accel_zbias2(&self) -> f64 {
        self.0[22]
    }

    pub fn set_accel_zbias2(&mut self, b: f64) {
        self.0[22] = b;
    }

    pub fn wind_vel(&self) -> Vector2<f64> {
        Vector2::new(self.0[14], self.0[15])
    }

    pub fn set_wind_vel(&mut self, w: Vector2<f64>) {
        self.0[14] = w.x;
        self.0[15] = w.y;
    }

    pub fn earth_magfield(&self) -> Vector3<f64> {
        Vector3::new(self.0[16], self.0[17], self.0[18])
    }

    pub fn set_earth_magfield(&mut self, m: Vector3<f64>) {
        self.0[16] = m.x;
        self.0[17] = m.y;
        self.0[18] = m.z;
    }

    pub fn body_magfield(&self) -> Vector3<f64> {
        Vector3::new(self.0[19], self.0[20], self.0[21])
    }

    pub fn set_body_magfield(&mut self, m: Vector3<f64>) {
        self.0[19] = m.x;
        self.0[20] = m.y;
        self.0[21] = m.z;
    }

    pub fn vel1(&self) -> Vector3<f64> {
        Vector3::new(self.0[23], self.0[24], self.0[25])
    }

    pub fn set_vel1(&mut self, v: Vector3<f64>) {
        self.0[23] = v.x;
        self.0[24] = v.y;
        self.0[25] = v.z;
    }

    pub fn pos_d1(&self) -> f64 {
        self.0[26]
    }

    pub fn set_pos_d1(&mut self, p: f64) {
        self.0[26] = p;
    }

    pub fn vel2(&self) -> Vector3<f64> {
        Vector3::new(self.0[27], self.0[28], self.0[29])
    }

    pub fn set_vel2(&mut self, v: Vector3<f64>) {
        self.0[27] = v.x;
        self.0[28] = v.y;
        self.0[29] = v.z;
    }

    pub fn pos_d2(&self) -> f64 {
        self.0[30]
    }

    pub fn set_pos_d2(&mut self, p: f64) {
        self.0[30] = p;
    }

    pub fn as_array(&self) -> &[f64; NUM_STATES] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn named_and_indexed_views_agree() {
        let mut s = StateVector::default();
        s.set_velocity(Vector3::new(1.0, 2.0, 3.0));
        s[7] = 40.0;
        assert_eq!(s[4], 1.0);
        assert_eq!(s[5], 2.0);
        assert_eq!(s[6], 3.0);
        assert_eq!(s.position().x, 40.0);
        s.set_accel_zbias2(0.5);
        assert_eq!(s[22], 0.5);
    }

    #[test]
    fn default_quat_is_identity() {
        let s = StateVector::default();
        assert_eq!(s.quat().0, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let mut s = StateVector::default();
        s.set_position(Vector3::new(1.0, -2.0, 3.0));
        let json = serde_json::to_string(&s).unwrap();
        let back: StateVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_array(), s.as_array());
    }
}
