// Small-vector and quaternion helpers used by the filter core.
//
// The quaternion is a plain scalar-first [w, x, y, z] array with the handful
// of operations the strapdown mechanisation needs. Keeping the component
// maths explicit makes the filter expressions line up with the symbolic
// derivation that produced the covariance and gain code.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}

/// Attitude quaternion, scalar-first, kept unit-norm by the filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat(pub [f64; 4]);

impl Default for Quat {
    fn default() -> Self {
        Quat([1.0, 0.0, 0.0, 0.0])
    }
}

impl Quat {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quat([w, x, y, z])
    }

    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let cr2 = (roll * 0.5).cos();
        let cp2 = (pitch * 0.5).cos();
        let cy2 = (yaw * 0.5).cos();
        let sr2 = (roll * 0.5).sin();
        let sp2 = (pitch * 0.5).sin();
        let sy2 = (yaw * 0.5).sin();
        Quat([
            cr2 * cp2 * cy2 + sr2 * sp2 * sy2,
            sr2 * cp2 * cy2 - cr2 * sp2 * sy2,
            cr2 * sp2 * cy2 + sr2 * cp2 * sy2,
            cr2 * cp2 * sy2 - sr2 * sp2 * cy2,
        ])
    }

    /// Delta quaternion equivalent to a small rotation vector. Identity when
    /// the rotation magnitude is below 1e-12.
    pub fn from_rotation_vector(dtheta: Vector3<f64>) -> Self {
        let mag = dtheta.norm();
        if mag < 1e-12 {
            Quat([1.0, 0.0, 0.0, 0.0])
        } else {
            let scaler = (0.5 * mag).sin() / mag;
            Quat([
                (0.5 * mag).cos(),
                dtheta.x * scaler,
                dtheta.y * scaler,
                dtheta.z * scaler,
            ])
        }
    }

    pub fn length(&self) -> f64 {
        let q = &self.0;
        (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt()
    }

    pub fn normalize(&mut self) {
        let len = self.length();
        if len > 1e-16 {
            for c in self.0.iter_mut() {
                *c /= len;
            }
        } else {
            self.0 = [1.0, 0.0, 0.0, 0.0];
        }
    }

    pub fn is_nan(&self) -> bool {
        self.0.iter().any(|c| c.is_nan())
    }

    /// Euler angles (roll, pitch, yaw) in radians.
    pub fn to_euler(&self) -> (f64, f64, f64) {
        let [q0, q1, q2, q3] = self.0;
        let roll = (2.0 * (q0 * q1 + q2 * q3)).atan2(1.0 - 2.0 * (q1 * q1 + q2 * q2));
        let pitch = (2.0 * (q0 * q2 - q3 * q1)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (q0 * q3 + q1 * q2)).atan2(1.0 - 2.0 * (q2 * q2 + q3 * q3));
        (roll, pitch, yaw)
    }

    /// Body-to-NED rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        let [q0, q1, q2, q3] = self.0;
        Matrix3::new(
            1.0 - 2.0 * (q2 * q2 + q3 * q3),
            2.0 * (q1 * q2 - q0 * q3),
            2.0 * (q1 * q3 + q0 * q2),
            2.0 * (q1 * q2 + q0 * q3),
            1.0 - 2.0 * (q1 * q1 + q3 * q3),
            2.0 * (q2 * q3 - q0 * q1),
            2.0 * (q1 * q3 - q0 * q2),
            2.0 * (q2 * q3 + q0 * q1),
            1.0 - 2.0 * (q1 * q1 + q2 * q2),
        )
    }
}

/// Rotate the attitude through a delta quaternion: `q_new = q ⊗ dq`.
pub fn quat_rotate(q: &Quat, dq: &Quat) -> Quat {
    let a = &q.0;
    let d = &dq.0;
    Quat([
        a[0] * d[0] - a[1] * d[1] - a[2] * d[2] - a[3] * d[3],
        a[0] * d[1] + a[1] * d[0] + a[2] * d[3] - a[3] * d[2],
        a[0] * d[2] + a[2] * d[0] + a[3] * d[1] - a[1] * d[3],
        a[0] * d[3] + a[3] * d[0] + a[1] * d[2] - a[2] * d[1],
    ])
}

/// NE offset in metres from `origin` to `point` on a locally flat earth.
pub fn latlon_to_ne(
    lat: f64,
    lon: f64,
    origin_lat: f64,
    origin_lon: f64,
) -> (f64, f64) {
    const R: f64 = 6_371_000.0;
    let d_lat = (lat - origin_lat).to_radians();
    let d_lon = (lon - origin_lon).to_radians();
    let north = R * d_lat;
    let east = R * d_lon * origin_lat.to_radians().cos();
    (north, east)
}

/// Inverse of [`latlon_to_ne`]: offset an origin by NE metres.
pub fn ne_to_latlon(
    north: f64,
    east: f64,
    origin_lat: f64,
    origin_lon: f64,
) -> (f64, f64) {
    const R: f64 = 6_371_000.0;
    let lat = origin_lat + (north / R).to_degrees();
    let lon = origin_lon + (east / (R * origin_lat.to_radians().cos())).to_degrees();
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn euler_round_trip() {
        let q = Quat::from_euler(0.2, -0.1, 1.3);
        let (r, p, y) = q.to_euler();
        assert_abs_diff_eq!(r, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(p, -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 1.3, epsilon = 1e-12);
    }

    #[test]
    fn rotation_vector_small_angle_is_identity() {
        let q = Quat::from_rotation_vector(Vector3::new(1e-15, 0.0, 0.0));
        assert_eq!(q.0, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn quat_rotation_matches_yaw_rotation() {
        // 90 degree yaw applied in two 45 degree increments
        let mut q = Quat::default();
        let dq = Quat::from_rotation_vector(Vector3::new(
            0.0,
            0.0,
            std::f64::consts::FRAC_PI_4,
        ));
        q = quat_rotate(&q, &dq);
        q = quat_rotate(&q, &dq);
        q.normalize();
        let (_, _, yaw) = q.to_euler();
        assert_abs_diff_eq!(yaw, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn ne_round_trip() {
        let (n, e) = latlon_to_ne(47.3981, 8.5460, 47.3977, 8.5456);
        let (lat, lon) = ne_to_latlon(n, e, 47.3977, 8.5456);
        assert_abs_diff_eq!(lat, 47.3981, epsilon = 1e-9);
        assert_abs_diff_eq!(lon, 8.5460, epsilon = 1e-9);
    }
}
