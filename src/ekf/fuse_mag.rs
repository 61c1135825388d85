// Magnetometer fusion.
//
// The three axes are fused as sequential scalar measurements on consecutive
// filter cycles (X on the cycle the data arrives, then Y, then Z) to spread
// the computational cost. The observation Jacobians and Kalman gains are
// the symbolic derivation output with the SH_MAG/SK_MX/SK_MY/SK_MZ
// sub-expression names preserved.

use crate::maths::sq;

use super::{Matrix22, NavEkf, MAG_VAR_RATE_SCALE};

/// Working data shared by the three sequential axis fusions. Populated when
/// the X axis is fused and reused on the two following cycles.
#[derive(Clone, Copy, Default)]
pub(super) struct MagFusionState {
    pub q: [f64; 4],
    pub mag_n: f64,
    pub mag_e: f64,
    pub mag_d: f64,
    pub mag_xbias: f64,
    pub mag_ybias: f64,
    pub mag_zbias: f64,
    /// Next axis to fuse: 0 = X (new data), 1 = Y, 2 = Z, 3 = idle
    pub obs_index: usize,
    pub mag_pred: [f64; 3],
    pub r_mag: f64,
    pub sh_mag: [f64; 9],
}

impl NavEkf {
    pub(super) fn fuse_magnetometer(&mut self) {
        let obs_index = self.mag_state.obs_index;
        if !(self.fuse_mag_data || obs_index == 1 || obs_index == 2) {
            // nothing to fuse this cycle
            self.mag_fuse_performed = false;
            self.mag_fuse_required = false;
            self.force_symmetry();
            self.constrain_variances();
            return;
        }

        let mut h_mag = [0.0_f64; 22];
        let mut kfusion = [0.0_f64; 31];
        let axis;
        if self.fuse_mag_data {
            axis = 0;
            let mut ms = self.mag_state;
            let s = &self.states_at_mag_meas_time;
            ms.q = s.quat().0;
            let earth = s.earth_magfield();
            let body = s.body_magfield();
            ms.mag_n = earth.x;
            ms.mag_e = earth.y;
            ms.mag_d = earth.z;
            ms.mag_xbias = body.x;
            ms.mag_ybias = body.y;
            ms.mag_zbias = body.z;

            // rotate the predicted earth field into body axes and add the
            // body field offsets to form the predicted measurement
            let [q0, q1, q2, q3] = ms.q;
            let dcm = [
                [
                    q0 * q0 + q1 * q1 - q2 * q2 - q3 * q3,
                    2.0 * (q1 * q2 + q0 * q3),
                    2.0 * (q1 * q3 - q0 * q2),
                ],
                [
                    2.0 * (q1 * q2 - q0 * q3),
                    q0 * q0 - q1 * q1 + q2 * q2 - q3 * q3,
                    2.0 * (q2 * q3 + q0 * q1),
                ],
                [
                    2.0 * (q1 * q3 + q0 * q2),
                    2.0 * (q2 * q3 - q0 * q1),
                    q0 * q0 - q1 * q1 - q2 * q2 + q3 * q3,
                ],
            ];
            for (i, row) in dcm.iter().enumerate() {
                ms.mag_pred[i] = row[0] * ms.mag_n
                    + row[1] * ms.mag_e
                    + row[2] * ms.mag_d;
            }
            ms.mag_pred[0] += ms.mag_xbias;
            ms.mag_pred[1] += ms.mag_ybias;
            ms.mag_pred[2] += ms.mag_zbias;

            // scale the observation error with total angular rate
            ms.r_mag = sq(self.config.mag_noise.clamp(0.01, 0.5))
                + sq(MAG_VAR_RATE_SCALE * self.d_ang_imu.norm() / self.dt_imu);

            let gains = mag_x_gains(
                &self.p,
                ms.r_mag,
                q0,
                q1,
                q2,
                q3,
                ms.mag_n,
                ms.mag_e,
                ms.mag_d,
                &mut ms.sh_mag,
                &mut h_mag,
                &mut kfusion,
            );
            self.mag_state = ms;
            match gains {
                Some(var) => {
                    self.var_innov_mag[0] = var;
                    self.fault_status.bad_xmag = false;
                }
                None => {
                    // badly conditioned; bump the variance and retry on the
                    // next cycle with the Y axis
                    self.p[19][19] += 0.1 * ms.r_mag;
                    self.mag_state.obs_index = 1;
                    self.fault_status.bad_xmag = true;
                    return;
                }
            }
            self.mag_state.obs_index = 0;
            self.mag_fuse_performed = true;
            self.mag_fuse_required = true;
        } else if obs_index == 1 {
            axis = 1;
            let ms = self.mag_state;
            let [q0, q1, q2, q3] = ms.q;
            match mag_y_gains(
                &self.p,
                ms.r_mag,
                q0,
                q1,
                q2,
                q3,
                ms.mag_d,
                &ms.sh_mag,
                &mut h_mag,
                &mut kfusion,
            ) {
                Some(var) => {
                    self.var_innov_mag[1] = var;
                    self.fault_status.bad_ymag = false;
                }
                None => {
                    self.p[20][20] += 0.1 * ms.r_mag;
                    self.mag_state.obs_index = 2;
                    self.fault_status.bad_ymag = true;
                    return;
                }
            }
            self.mag_fuse_performed = true;
            self.mag_fuse_required = true;
        } else {
            axis = 2;
            let ms = self.mag_state;
            let [q0, q1, q2, q3] = ms.q;
            match mag_z_gains(
                &self.p,
                ms.r_mag,
                q0,
                q1,
                q2,
                q3,
                ms.mag_n,
                ms.mag_e,
                ms.mag_d,
                &ms.sh_mag,
                &mut h_mag,
                &mut kfusion,
            ) {
                Some(var) => {
                    self.var_innov_mag[2] = var;
                    self.fault_status.bad_zmag = false;
                }
                None => {
                    self.p[21][21] += 0.1 * ms.r_mag;
                    self.mag_state.obs_index = 3;
                    self.fault_status.bad_zmag = true;
                    return;
                }
            }
            self.mag_fuse_performed = true;
            self.mag_fuse_required = false;
        }

        if self.inhibit_wind_states {
            kfusion[14] = 0.0;
            kfusion[15] = 0.0;
        }
        if self.inhibit_mag_states {
            for k in kfusion.iter_mut().take(22).skip(16) {
                *k = 0.0;
            }
        }

        self.innov_mag[axis] = self.mag_state.mag_pred[axis] - self.mag_data[axis];
        self.mag_test_ratio[axis] = sq(self.innov_mag[axis])
            / (sq(self.config.mag_innov_gate) * self.var_innov_mag[axis]);
        self.mag_health = self.mag_test_ratio[0] < 1.0
            && self.mag_test_ratio[1] < 1.0
            && self.mag_test_ratio[2] < 1.0;

        // Don't fuse unless all components pass. The exception is a timed
        // out compass on a vehicle that can't use the sideslip assumption;
        // then a passing axis is still fused at 1/4 weighting.
        let degraded_use = self.mag_test_ratio[axis] < 1.0
            && !self.assume_zero_sideslip()
            && self.mag_timeout;
        if self.mag_health || degraded_use {
            // Spread attitude corrections across the frames remaining until
            // the next measurement unless rotating fast enough to need the
            // correction immediately.
            let high_rates =
                self.mag_update_count_max as f64 * self.corrected_del_ang.norm() > 0.1;
            let minor_frames_to_go =
                self.mag_update_count_max as f64 - self.mag_update_count as f64;
            for j in 0..=21 {
                if !self.mag_health {
                    kfusion[j] *= 0.25;
                }
                if (j <= 3 && high_rates)
                    || j >= 10
                    || self.static_mode
                    || minor_frames_to_go < 1.5
                {
                    self.state[j] -= kfusion[j] * self.innov_mag[axis];
                } else {
                    self.mag_incr_state_delta[j] -= kfusion[j]
                        * self.innov_mag[axis]
                        * (self.mag_update_count_max_inv * self.mag_update_count_max as f64
                            / minor_frames_to_go);
                }
            }
            self.state.normalize_quat();

            // P = (I - K*H)*P, exploiting the empty columns of H
            let mut kh = [[0.0_f64; 22]; 22];
            for i in 0..=21 {
                for j in 0..=3 {
                    kh[i][j] = kfusion[i] * h_mag[j];
                }
                if !self.inhibit_mag_states {
                    for j in 16..=21 {
                        kh[i][j] = kfusion[i] * h_mag[j];
                    }
                }
            }
            let mut khp = [[0.0_f64; 22]; 22];
            for i in 0..=21 {
                for j in 0..=21 {
                    let mut acc = 0.0;
                    for (k, kh_row) in kh[i].iter().enumerate().take(4) {
                        acc += kh_row * self.p[k][j];
                    }
                    if !self.inhibit_mag_states {
                        for k in 16..=21 {
                            acc += kh[i][k] * self.p[k][j];
                        }
                    }
                    khp[i][j] = acc;
                }
            }
            for i in 0..=21 {
                for j in 0..=21 {
                    self.p[i][j] -= khp[i][j];
                }
            }
        }
        self.mag_state.obs_index = axis + 1;

        self.force_symmetry();
        self.constrain_variances();
    }
}

/// X axis observation Jacobian and gains. Also evaluates the SH_MAG
/// sub-expressions reused by the Y and Z axes. Returns the innovation
/// variance, or `None` when the calculation is badly conditioned.
#[allow(non_snake_case)]
#[allow(clippy::too_many_arguments)]
fn mag_x_gains(
    P: &Matrix22,
    R_MAG: f64,
    q0: f64,
    q1: f64,
    q2: f64,
    q3: f64,
    magN: f64,
    magE: f64,
    magD: f64,
    SH_MAG: &mut [f64; 9],
    H_MAG: &mut [f64; 22],
    Kfusion: &mut [f64; 31],
) -> Option<f64> {
    SH_MAG[0] = 2.0*magD*q3 + 2.0*magE*q2 + 2.0*magN*q1;
    SH_MAG[1] = 2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2;
    SH_MAG[2] = 2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3;
    SH_MAG[3] = sq(q3);
    SH_MAG[4] = sq(q2);
    SH_MAG[5] = sq(q1);
    SH_MAG[6] = sq(q0);
    SH_MAG[7] = 2.0*magN*q0;
    SH_MAG[8] = 2.0*magE*q3;

    H_MAG[0] = SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2;
    H_MAG[1] = SH_MAG[0];
    H_MAG[2] = 2.0*magE*q1 - 2.0*magD*q0 - 2.0*magN*q2;
    H_MAG[3] = SH_MAG[2];
    H_MAG[16] = SH_MAG[5] - SH_MAG[4] - SH_MAG[3] + SH_MAG[6];
    H_MAG[17] = 2.0*q0*q3 + 2.0*q1*q2;
    H_MAG[18] = 2.0*q1*q3 - 2.0*q0*q2;
    H_MAG[19] = 1.0;

    let temp = P[19][19] + R_MAG + P[1][19]*SH_MAG[0] + P[3][19]*SH_MAG[2] - P[16][19]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) - (2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2)*(P[19][2] + P[1][2]*SH_MAG[0] + P[3][2]*SH_MAG[2] - P[16][2]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][2]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][2]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][2]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][2]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + (SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)*(P[19][0] + P[1][0]*SH_MAG[0] + P[3][0]*SH_MAG[2] - P[16][0]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][0]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][0]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][0]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][0]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + SH_MAG[0]*(P[19][1] + P[1][1]*SH_MAG[0] + P[3][1]*SH_MAG[2] - P[16][1]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][1]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][1]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][1]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][1]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + SH_MAG[2]*(P[19][3] + P[1][3]*SH_MAG[0] + P[3][3]*SH_MAG[2] - P[16][3]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][3]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][3]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][3]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][3]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - (SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6])*(P[19][16] + P[1][16]*SH_MAG[0] + P[3][16]*SH_MAG[2] - P[16][16]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][16]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][16]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][16]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][16]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + P[17][19]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][19]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][19]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + (2.0*q0*q3 + 2.0*q1*q2)*(P[19][17] + P[1][17]*SH_MAG[0] + P[3][17]*SH_MAG[2] - P[16][17]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][17]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][17]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][17]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][17]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - (2.0*q0*q2 - 2.0*q1*q3)*(P[19][18] + P[1][18]*SH_MAG[0] + P[3][18]*SH_MAG[2] - P[16][18]*(SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6]) + P[17][18]*(2.0*q0*q3 + 2.0*q1*q2) - P[18][18]*(2.0*q0*q2 - 2.0*q1*q3) - P[2][18]*(2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2) + P[0][18]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + P[0][19]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2);
    if temp < R_MAG {
        return None;
    }
    let mut SK_MX = [0.0_f64; 6];
    SK_MX[0] = 1.0 / temp;
    SK_MX[1] = SH_MAG[3] + SH_MAG[4] - SH_MAG[5] - SH_MAG[6];
    SK_MX[2] = 2.0*magD*q0 - 2.0*magE*q1 + 2.0*magN*q2;
    SK_MX[3] = SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2;
    SK_MX[4] = 2.0*q0*q2 - 2.0*q1*q3;
    SK_MX[5] = 2.0*q0*q3 + 2.0*q1*q2;
    Kfusion[0] = SK_MX[0]*(P[0][19] + P[0][1]*SH_MAG[0] + P[0][3]*SH_MAG[2] + P[0][0]*SK_MX[3] - P[0][2]*SK_MX[2] - P[0][16]*SK_MX[1] + P[0][17]*SK_MX[5] - P[0][18]*SK_MX[4]);
    Kfusion[1] = SK_MX[0]*(P[1][19] + P[1][1]*SH_MAG[0] + P[1][3]*SH_MAG[2] + P[1][0]*SK_MX[3] - P[1][2]*SK_MX[2] - P[1][16]*SK_MX[1] + P[1][17]*SK_MX[5] - P[1][18]*SK_MX[4]);
    Kfusion[2] = SK_MX[0]*(P[2][19] + P[2][1]*SH_MAG[0] + P[2][3]*SH_MAG[2] + P[2][0]*SK_MX[3] - P[2][2]*SK_MX[2] - P[2][16]*SK_MX[1] + P[2][17]*SK_MX[5] - P[2][18]*SK_MX[4]);
    Kfusion[3] = SK_MX[0]*(P[3][19] + P[3][1]*SH_MAG[0] + P[3][3]*SH_MAG[2] + P[3][0]*SK_MX[3] - P[3][2]*SK_MX[2] - P[3][16]*SK_MX[1] + P[3][17]*SK_MX[5] - P[3][18]*SK_MX[4]);
    Kfusion[4] = SK_MX[0]*(P[4][19] + P[4][1]*SH_MAG[0] + P[4][3]*SH_MAG[2] + P[4][0]*SK_MX[3] - P[4][2]*SK_MX[2] - P[4][16]*SK_MX[1] + P[4][17]*SK_MX[5] - P[4][18]*SK_MX[4]);
    Kfusion[5] = SK_MX[0]*(P[5][19] + P[5][1]*SH_MAG[0] + P[5][3]*SH_MAG[2] + P[5][0]*SK_MX[3] - P[5][2]*SK_MX[2] - P[5][16]*SK_MX[1] + P[5][17]*SK_MX[5] - P[5][18]*SK_MX[4]);
    Kfusion[6] = SK_MX[0]*(P[6][19] + P[6][1]*SH_MAG[0] + P[6][3]*SH_MAG[2] + P[6][0]*SK_MX[3] - P[6][2]*SK_MX[2] - P[6][16]*SK_MX[1] + P[6][17]*SK_MX[5] - P[6][18]*SK_MX[4]);
    Kfusion[7] = SK_MX[0]*(P[7][19] + P[7][1]*SH_MAG[0] + P[7][3]*SH_MAG[2] + P[7][0]*SK_MX[3] - P[7][2]*SK_MX[2] - P[7][16]*SK_MX[1] + P[7][17]*SK_MX[5] - P[7][18]*SK_MX[4]);
    Kfusion[8] = SK_MX[0]*(P[8][19] + P[8][1]*SH_MAG[0] + P[8][3]*SH_MAG[2] + P[8][0]*SK_MX[3] - P[8][2]*SK_MX[2] - P[8][16]*SK_MX[1] + P[8][17]*SK_MX[5] - P[8][18]*SK_MX[4]);
    Kfusion[9] = SK_MX[0]*(P[9][19] + P[9][1]*SH_MAG[0] + P[9][3]*SH_MAG[2] + P[9][0]*SK_MX[3] - P[9][2]*SK_MX[2] - P[9][16]*SK_MX[1] + P[9][17]*SK_MX[5] - P[9][18]*SK_MX[4]);
    Kfusion[10] = SK_MX[0]*(P[10][19] + P[10][1]*SH_MAG[0] + P[10][3]*SH_MAG[2] + P[10][0]*SK_MX[3] - P[10][2]*SK_MX[2] - P[10][16]*SK_MX[1] + P[10][17]*SK_MX[5] - P[10][18]*SK_MX[4]);
    Kfusion[11] = SK_MX[0]*(P[11][19] + P[11][1]*SH_MAG[0] + P[11][3]*SH_MAG[2] + P[11][0]*SK_MX[3] - P[11][2]*SK_MX[2] - P[11][16]*SK_MX[1] + P[11][17]*SK_MX[5] - P[11][18]*SK_MX[4]);
    Kfusion[12] = SK_MX[0]*(P[12][19] + P[12][1]*SH_MAG[0] + P[12][3]*SH_MAG[2] + P[12][0]*SK_MX[3] - P[12][2]*SK_MX[2] - P[12][16]*SK_MX[1] + P[12][17]*SK_MX[5] - P[12][18]*SK_MX[4]);
    // zeroed to protect the Z accel bias estimate
    Kfusion[13] = 0.0;
    Kfusion[14] = SK_MX[0]*(P[14][19] + P[14][1]*SH_MAG[0] + P[14][3]*SH_MAG[2] + P[14][0]*SK_MX[3] - P[14][2]*SK_MX[2] - P[14][16]*SK_MX[1] + P[14][17]*SK_MX[5] - P[14][18]*SK_MX[4]);
    Kfusion[15] = SK_MX[0]*(P[15][19] + P[15][1]*SH_MAG[0] + P[15][3]*SH_MAG[2] + P[15][0]*SK_MX[3] - P[15][2]*SK_MX[2] - P[15][16]*SK_MX[1] + P[15][17]*SK_MX[5] - P[15][18]*SK_MX[4]);
    Kfusion[16] = SK_MX[0]*(P[16][19] + P[16][1]*SH_MAG[0] + P[16][3]*SH_MAG[2] + P[16][0]*SK_MX[3] - P[16][2]*SK_MX[2] - P[16][16]*SK_MX[1] + P[16][17]*SK_MX[5] - P[16][18]*SK_MX[4]);
    Kfusion[17] = SK_MX[0]*(P[17][19] + P[17][1]*SH_MAG[0] + P[17][3]*SH_MAG[2] + P[17][0]*SK_MX[3] - P[17][2]*SK_MX[2] - P[17][16]*SK_MX[1] + P[17][17]*SK_MX[5] - P[17][18]*SK_MX[4]);
    Kfusion[18] = SK_MX[0]*(P[18][19] + P[18][1]*SH_MAG[0] + P[18][3]*SH_MAG[2] + P[18][0]*SK_MX[3] - P[18][2]*SK_MX[2] - P[18][16]*SK_MX[1] + P[18][17]*SK_MX[5] - P[18][18]*SK_MX[4]);
    Kfusion[19] = SK_MX[0]*(P[19][19] + P[19][1]*SH_MAG[0] + P[19][3]*SH_MAG[2] + P[19][0]*SK_MX[3] - P[19][2]*SK_MX[2] - P[19][16]*SK_MX[1] + P[19][17]*SK_MX[5] - P[19][18]*SK_MX[4]);
    Kfusion[20] = SK_MX[0]*(P[20][19] + P[20][1]*SH_MAG[0] + P[20][3]*SH_MAG[2] + P[20][0]*SK_MX[3] - P[20][2]*SK_MX[2] - P[20][16]*SK_MX[1] + P[20][17]*SK_MX[5] - P[20][18]*SK_MX[4]);
    Kfusion[21] = SK_MX[0]*(P[21][19] + P[21][1]*SH_MAG[0] + P[21][3]*SH_MAG[2] + P[21][0]*SK_MX[3] - P[21][2]*SK_MX[2] - P[21][16]*SK_MX[1] + P[21][17]*SK_MX[5] - P[21][18]*SK_MX[4]);
    Some(temp)
}

#[allow(non_snake_case)]
#[allow(clippy::too_many_arguments)]
fn mag_y_gains(
    P: &Matrix22,
    R_MAG: f64,
    q0: f64,
    q1: f64,
    q2: f64,
    q3: f64,
    magD: f64,
    SH_MAG: &[f64; 9],
    H_MAG: &mut [f64; 22],
    Kfusion: &mut [f64; 31],
) -> Option<f64> {
    H_MAG[0] = SH_MAG[2];
    H_MAG[1] = SH_MAG[1];
    H_MAG[2] = SH_MAG[0];
    H_MAG[3] = 2.0*magD*q2 - SH_MAG[8] - SH_MAG[7];
    H_MAG[16] = 2.0*q1*q2 - 2.0*q0*q3;
    H_MAG[17] = SH_MAG[4] - SH_MAG[3] - SH_MAG[5] + SH_MAG[6];
    H_MAG[18] = 2.0*q0*q1 + 2.0*q2*q3;
    H_MAG[20] = 1.0;

    let temp = P[20][20] + R_MAG + P[0][20]*SH_MAG[2] + P[1][20]*SH_MAG[1] + P[2][20]*SH_MAG[0] - P[17][20]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - (2.0*q0*q3 - 2.0*q1*q2)*(P[20][16] + P[0][16]*SH_MAG[2] + P[1][16]*SH_MAG[1] + P[2][16]*SH_MAG[0] - P[17][16]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][16]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][16]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][16]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + (2.0*q0*q1 + 2.0*q2*q3)*(P[20][18] + P[0][18]*SH_MAG[2] + P[1][18]*SH_MAG[1] + P[2][18]*SH_MAG[0] - P[17][18]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][18]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][18]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][18]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - (SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)*(P[20][3] + P[0][3]*SH_MAG[2] + P[1][3]*SH_MAG[1] + P[2][3]*SH_MAG[0] - P[17][3]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][3]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][3]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][3]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - P[16][20]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][20]*(2.0*q0*q1 + 2.0*q2*q3) + SH_MAG[2]*(P[20][0] + P[0][0]*SH_MAG[2] + P[1][0]*SH_MAG[1] + P[2][0]*SH_MAG[0] - P[17][0]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][0]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][0]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][0]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + SH_MAG[1]*(P[20][1] + P[0][1]*SH_MAG[2] + P[1][1]*SH_MAG[1] + P[2][1]*SH_MAG[0] - P[17][1]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][1]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][1]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][1]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + SH_MAG[0]*(P[20][2] + P[0][2]*SH_MAG[2] + P[1][2]*SH_MAG[1] + P[2][2]*SH_MAG[0] - P[17][2]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][2]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][2]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][2]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - (SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6])*(P[20][17] + P[0][17]*SH_MAG[2] + P[1][17]*SH_MAG[1] + P[2][17]*SH_MAG[0] - P[17][17]*(SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6]) - P[16][17]*(2.0*q0*q3 - 2.0*q1*q2) + P[18][17]*(2.0*q0*q1 + 2.0*q2*q3) - P[3][17]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - P[3][20]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2);
    if temp < R_MAG {
        return None;
    }
    let mut SK_MY = [0.0_f64; 5];
    SK_MY[0] = 1.0 / temp;
    SK_MY[1] = SH_MAG[3] - SH_MAG[4] + SH_MAG[5] - SH_MAG[6];
    SK_MY[2] = SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2;
    SK_MY[3] = 2.0*q0*q3 - 2.0*q1*q2;
    SK_MY[4] = 2.0*q0*q1 + 2.0*q2*q3;
    Kfusion[0] = SK_MY[0]*(P[0][20] + P[0][0]*SH_MAG[2] + P[0][1]*SH_MAG[1] + P[0][2]*SH_MAG[0] - P[0][3]*SK_MY[2] - P[0][17]*SK_MY[1] - P[0][16]*SK_MY[3] + P[0][18]*SK_MY[4]);
    Kfusion[1] = SK_MY[0]*(P[1][20] + P[1][0]*SH_MAG[2] + P[1][1]*SH_MAG[1] + P[1][2]*SH_MAG[0] - P[1][3]*SK_MY[2] - P[1][17]*SK_MY[1] - P[1][16]*SK_MY[3] + P[1][18]*SK_MY[4]);
    Kfusion[2] = SK_MY[0]*(P[2][20] + P[2][0]*SH_MAG[2] + P[2][1]*SH_MAG[1] + P[2][2]*SH_MAG[0] - P[2][3]*SK_MY[2] - P[2][17]*SK_MY[1] - P[2][16]*SK_MY[3] + P[2][18]*SK_MY[4]);
    Kfusion[3] = SK_MY[0]*(P[3][20] + P[3][0]*SH_MAG[2] + P[3][1]*SH_MAG[1] + P[3][2]*SH_MAG[0] - P[3][3]*SK_MY[2] - P[3][17]*SK_MY[1] - P[3][16]*SK_MY[3] + P[3][18]*SK_MY[4]);
    Kfusion[4] = SK_MY[0]*(P[4][20] + P[4][0]*SH_MAG[2] + P[4][1]*SH_MAG[1] + P[4][2]*SH_MAG[0] - P[4][3]*SK_MY[2] - P[4][17]*SK_MY[1] - P[4][16]*SK_MY[3] + P[4][18]*SK_MY[4]);
    Kfusion[5] = SK_MY[0]*(P[5][20] + P[5][0]*SH_MAG[2] + P[5][1]*SH_MAG[1] + P[5][2]*SH_MAG[0] - P[5][3]*SK_MY[2] - P[5][17]*SK_MY[1] - P[5][16]*SK_MY[3] + P[5][18]*SK_MY[4]);
    Kfusion[6] = SK_MY[0]*(P[6][20] + P[6][0]*SH_MAG[2] + P[6][1]*SH_MAG[1] + P[6][2]*SH_MAG[0] - P[6][3]*SK_MY[2] - P[6][17]*SK_MY[1] - P[6][16]*SK_MY[3] + P[6][18]*SK_MY[4]);
    Kfusion[7] = SK_MY[0]*(P[7][20] + P[7][0]*SH_MAG[2] + P[7][1]*SH_MAG[1] + P[7][2]*SH_MAG[0] - P[7][3]*SK_MY[2] - P[7][17]*SK_MY[1] - P[7][16]*SK_MY[3] + P[7][18]*SK_MY[4]);
    Kfusion[8] = SK_MY[0]*(P[8][20] + P[8][0]*SH_MAG[2] + P[8][1]*SH_MAG[1] + P[8][2]*SH_MAG[0] - P[8][3]*SK_MY[2] - P[8][17]*SK_MY[1] - P[8][16]*SK_MY[3] + P[8][18]*SK_MY[4]);
    Kfusion[9] = SK_MY[0]*(P[9][20] + P[9][0]*SH_MAG[2] + P[9][1]*SH_MAG[1] + P[9][2]*SH_MAG[0] - P[9][3]*SK_MY[2] - P[9][17]*SK_MY[1] - P[9][16]*SK_MY[3] + P[9][18]*SK_MY[4]);
    Kfusion[10] = SK_MY[0]*(P[10][20] + P[10][0]*SH_MAG[2] + P[10][1]*SH_MAG[1] + P[10][2]*SH_MAG[0] - P[10][3]*SK_MY[2] - P[10][17]*SK_MY[1] - P[10][16]*SK_MY[3] + P[10][18]*SK_MY[4]);
    Kfusion[11] = SK_MY[0]*(P[11][20] + P[11][0]*SH_MAG[2] + P[11][1]*SH_MAG[1] + P[11][2]*SH_MAG[0] - P[11][3]*SK_MY[2] - P[11][17]*SK_MY[1] - P[11][16]*SK_MY[3] + P[11][18]*SK_MY[4]);
    Kfusion[12] = SK_MY[0]*(P[12][20] + P[12][0]*SH_MAG[2] + P[12][1]*SH_MAG[1] + P[12][2]*SH_MAG[0] - P[12][3]*SK_MY[2] - P[12][17]*SK_MY[1] - P[12][16]*SK_MY[3] + P[12][18]*SK_MY[4]);
    // zeroed to protect the Z accel bias estimate
    Kfusion[13] = 0.0;
    Kfusion[14] = SK_MY[0]*(P[14][20] + P[14][0]*SH_MAG[2] + P[14][1]*SH_MAG[1] + P[14][2]*SH_MAG[0] - P[14][3]*SK_MY[2] - P[14][17]*SK_MY[1] - P[14][16]*SK_MY[3] + P[14][18]*SK_MY[4]);
    Kfusion[15] = SK_MY[0]*(P[15][20] + P[15][0]*SH_MAG[2] + P[15][1]*SH_MAG[1] + P[15][2]*SH_MAG[0] - P[15][3]*SK_MY[2] - P[15][17]*SK_MY[1] - P[15][16]*SK_MY[3] + P[15][18]*SK_MY[4]);
    Kfusion[16] = SK_MY[0]*(P[16][20] + P[16][0]*SH_MAG[2] + P[16][1]*SH_MAG[1] + P[16][2]*SH_MAG[0] - P[16][3]*SK_MY[2] - P[16][17]*SK_MY[1] - P[16][16]*SK_MY[3] + P[16][18]*SK_MY[4]);
    Kfusion[17] = SK_MY[0]*(P[17][20] + P[17][0]*SH_MAG[2] + P[17][1]*SH_MAG[1] + P[17][2]*SH_MAG[0] - P[17][3]*SK_MY[2] - P[17][17]*SK_MY[1] - P[17][16]*SK_MY[3] + P[17][18]*SK_MY[4]);
    Kfusion[18] = SK_MY[0]*(P[18][20] + P[18][0]*SH_MAG[2] + P[18][1]*SH_MAG[1] + P[18][2]*SH_MAG[0] - P[18][3]*SK_MY[2] - P[18][17]*SK_MY[1] - P[18][16]*SK_MY[3] + P[18][18]*SK_MY[4]);
    Kfusion[19] = SK_MY[0]*(P[19][20] + P[19][0]*SH_MAG[2] + P[19][1]*SH_MAG[1] + P[19][2]*SH_MAG[0] - P[19][3]*SK_MY[2] - P[19][17]*SK_MY[1] - P[19][16]*SK_MY[3] + P[19][18]*SK_MY[4]);
    Kfusion[20] = SK_MY[0]*(P[20][20] + P[20][0]*SH_MAG[2] + P[20][1]*SH_MAG[1] + P[20][2]*SH_MAG[0] - P[20][3]*SK_MY[2] - P[20][17]*SK_MY[1] - P[20][16]*SK_MY[3] + P[20][18]*SK_MY[4]);
    Kfusion[21] = SK_MY[0]*(P[21][20] + P[21][0]*SH_MAG[2] + P[21][1]*SH_MAG[1] + P[21][2]*SH_MAG[0] - P[21][3]*SK_MY[2] - P[21][17]*SK_MY[1] - P[21][16]*SK_MY[3] + P[21][18]*SK_MY[4]);
    Some(temp)
}

#[allow(non_snake_case)]
#[allow(clippy::too_many_arguments)]
fn mag_z_gains(
    P: &Matrix22,
    R_MAG: f64,
    q0: f64,
    q1: f64,
    q2: f64,
    q3: f64,
    magN: f64,
    magE: f64,
    magD: f64,
    SH_MAG: &[f64; 9],
    H_MAG: &mut [f64; 22],
    Kfusion: &mut [f64; 31],
) -> Option<f64> {
    H_MAG[0] = SH_MAG[1];
    H_MAG[1] = 2.0*magN*q3 - 2.0*magE*q0 - 2.0*magD*q1;
    H_MAG[2] = SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2;
    H_MAG[3] = SH_MAG[0];
    H_MAG[16] = 2.0*q0*q2 + 2.0*q1*q3;
    H_MAG[17] = 2.0*q2*q3 - 2.0*q0*q1;
    H_MAG[18] = SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6];
    H_MAG[21] = 1.0;

    let temp = P[21][21] + R_MAG + P[0][21]*SH_MAG[1] + P[3][21]*SH_MAG[0] + P[18][21]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) - (2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3)*(P[21][1] + P[0][1]*SH_MAG[1] + P[3][1]*SH_MAG[0] + P[18][1]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][1]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][1]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][1]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][1]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + (SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)*(P[21][2] + P[0][2]*SH_MAG[1] + P[3][2]*SH_MAG[0] + P[18][2]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][2]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][2]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][2]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][2]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + SH_MAG[1]*(P[21][0] + P[0][0]*SH_MAG[1] + P[3][0]*SH_MAG[0] + P[18][0]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][0]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][0]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][0]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][0]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + SH_MAG[0]*(P[21][3] + P[0][3]*SH_MAG[1] + P[3][3]*SH_MAG[0] + P[18][3]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][3]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][3]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][3]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][3]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + (SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6])*(P[21][18] + P[0][18]*SH_MAG[1] + P[3][18]*SH_MAG[0] + P[18][18]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][18]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][18]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][18]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][18]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + P[16][21]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][21]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][21]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + (2.0*q0*q2 + 2.0*q1*q3)*(P[21][16] + P[0][16]*SH_MAG[1] + P[3][16]*SH_MAG[0] + P[18][16]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][16]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][16]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][16]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][16]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) - (2.0*q0*q1 - 2.0*q2*q3)*(P[21][17] + P[0][17]*SH_MAG[1] + P[3][17]*SH_MAG[0] + P[18][17]*(SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6]) + P[16][17]*(2.0*q0*q2 + 2.0*q1*q3) - P[17][17]*(2.0*q0*q1 - 2.0*q2*q3) - P[1][17]*(2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3) + P[2][17]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2)) + P[2][21]*(SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2);
    if temp < R_MAG {
        return None;
    }
    let mut SK_MZ = [0.0_f64; 6];
    SK_MZ[0] = 1.0 / temp;
    SK_MZ[1] = SH_MAG[3] - SH_MAG[4] - SH_MAG[5] + SH_MAG[6];
    SK_MZ[2] = 2.0*magD*q1 + 2.0*magE*q0 - 2.0*magN*q3;
    SK_MZ[3] = SH_MAG[7] + SH_MAG[8] - 2.0*magD*q2;
    SK_MZ[4] = 2.0*q0*q1 - 2.0*q2*q3;
    SK_MZ[5] = 2.0*q0*q2 + 2.0*q1*q3;
    Kfusion[0] = SK_MZ[0]*(P[0][21] + P[0][0]*SH_MAG[1] + P[0][3]*SH_MAG[0] - P[0][1]*SK_MZ[2] + P[0][2]*SK_MZ[3] + P[0][18]*SK_MZ[1] + P[0][16]*SK_MZ[5] - P[0][17]*SK_MZ[4]);
    Kfusion[1] = SK_MZ[0]*(P[1][21] + P[1][0]*SH_MAG[1] + P[1][3]*SH_MAG[0] - P[1][1]*SK_MZ[2] + P[1][2]*SK_MZ[3] + P[1][18]*SK_MZ[1] + P[1][16]*SK_MZ[5] - P[1][17]*SK_MZ[4]);
    Kfusion[2] = SK_MZ[0]*(P[2][21] + P[2][0]*SH_MAG[1] + P[2][3]*SH_MAG[0] - P[2][1]*SK_MZ[2] + P[2][2]*SK_MZ[3] + P[2][18]*SK_MZ[1] + P[2][16]*SK_MZ[5] - P[2][17]*SK_MZ[4]);
    Kfusion[3] = SK_MZ[0]*(P[3][21] + P[3][0]*SH_MAG[1] + P[3][3]*SH_MAG[0] - P[3][1]*SK_MZ[2] + P[3][2]*SK_MZ[3] + P[3][18]*SK_MZ[1] + P[3][16]*SK_MZ[5] - P[3][17]*SK_MZ[4]);
    Kfusion[4] = SK_MZ[0]*(P[4][21] + P[4][0]*SH_MAG[1] + P[4][3]*SH_MAG[0] - P[4][1]*SK_MZ[2] + P[4][2]*SK_MZ[3] + P[4][18]*SK_MZ[1] + P[4][16]*SK_MZ[5] - P[4][17]*SK_MZ[4]);
    Kfusion[5] = SK_MZ[0]*(P[5][21] + P[5][0]*SH_MAG[1] + P[5][3]*SH_MAG[0] - P[5][1]*SK_MZ[2] + P[5][2]*SK_MZ[3] + P[5][18]*SK_MZ[1] + P[5][16]*SK_MZ[5] - P[5][17]*SK_MZ[4]);
    Kfusion[6] = SK_MZ[0]*(P[6][21] + P[6][0]*SH_MAG[1] + P[6][3]*SH_MAG[0] - P[6][1]*SK_MZ[2] + P[6][2]*SK_MZ[3] + P[6][18]*SK_MZ[1] + P[6][16]*SK_MZ[5] - P[6][17]*SK_MZ[4]);
    Kfusion[7] = SK_MZ[0]*(P[7][21] + P[7][0]*SH_MAG[1] + P[7][3]*SH_MAG[0] - P[7][1]*SK_MZ[2] + P[7][2]*SK_MZ[3] + P[7][18]*SK_MZ[1] + P[7][16]*SK_MZ[5] - P[7][17]*SK_MZ[4]);
    Kfusion[8] = SK_MZ[0]*(P[8][21] + P[8][0]*SH_MAG[1] + P[8][3]*SH_MAG[0] - P[8][1]*SK_MZ[2] + P[8][2]*SK_MZ[3] + P[8][18]*SK_MZ[1] + P[8][16]*SK_MZ[5] - P[8][17]*SK_MZ[4]);
    Kfusion[9] = SK_MZ[0]*(P[9][21] + P[9][0]*SH_MAG[1] + P[9][3]*SH_MAG[0] - P[9][1]*SK_MZ[2] + P[9][2]*SK_MZ[3] + P[9][18]*SK_MZ[1] + P[9][16]*SK_MZ[5] - P[9][17]*SK_MZ[4]);
    Kfusion[10] = SK_MZ[0]*(P[10][21] + P[10][0]*SH_MAG[1] + P[10][3]*SH_MAG[0] - P[10][1]*SK_MZ[2] + P[10][2]*SK_MZ[3] + P[10][18]*SK_MZ[1] + P[10][16]*SK_MZ[5] - P[10][17]*SK_MZ[4]);
    Kfusion[11] = SK_MZ[0]*(P[11][21] + P[11][0]*SH_MAG[1] + P[11][3]*SH_MAG[0] - P[11][1]*SK_MZ[2] + P[11][2]*SK_MZ[3] + P[11][18]*SK_MZ[1] + P[11][16]*SK_MZ[5] - P[11][17]*SK_MZ[4]);
    Kfusion[12] = SK_MZ[0]*(P[12][21] + P[12][0]*SH_MAG[1] + P[12][3]*SH_MAG[0] - P[12][1]*SK_MZ[2] + P[12][2]*SK_MZ[3] + P[12][18]*SK_MZ[1] + P[12][16]*SK_MZ[5] - P[12][17]*SK_MZ[4]);
    // zeroed to protect the Z accel bias estimate
    Kfusion[13] = 0.0;
    Kfusion[14] = SK_MZ[0]*(P[14][21] + P[14][0]*SH_MAG[1] + P[14][3]*SH_MAG[0] - P[14][1]*SK_MZ[2] + P[14][2]*SK_MZ[3] + P[14][18]*SK_MZ[1] + P[14][16]*SK_MZ[5] - P[14][17]*SK_MZ[4]);
    Kfusion[15] = SK_MZ[0]*(P[15][21] + P[15][0]*SH_MAG[1] + P[15][3]*SH_MAG[0] - P[15][1]*SK_MZ[2] + P[15][2]*SK_MZ[3] + P[15][18]*SK_MZ[1] + P[15][16]*SK_MZ[5] - P[15][17]*SK_MZ[4]);
    Kfusion[16] = SK_MZ[0]*(P[16][21] + P[16][0]*SH_MAG[1] + P[16][3]*SH_MAG[0] - P[16][1]*SK_MZ[2] + P[16][2]*SK_MZ[3] + P[16][18]*SK_MZ[1] + P[16][16]*SK_MZ[5] - P[16][17]*SK_MZ[4]);
    Kfusion[17] = SK_MZ[0]*(P[17][21] + P[17][0]*SH_MAG[1] + P[17][3]*SH_MAG[0] - P[17][1]*SK_MZ[2] + P[17][2]*SK_MZ[3] + P[17][18]*SK_MZ[1] + P[17][16]*SK_MZ[5] - P[17][17]*SK_MZ[4]);
    Kfusion[18] = SK_MZ[0]*(P[18][21] + P[18][0]*SH_MAG[1] + P[18][3]*SH_MAG[0] - P[18][1]*SK_MZ[2] + P[18][2]*SK_MZ[3] + P[18][18]*SK_MZ[1] + P[18][16]*SK_MZ[5] - P[18][17]*SK_MZ[4]);
    Kfusion[19] = SK_MZ[0]*(P[19][21] + P[19][0]*SH_MAG[1] + P[19][3]*SH_MAG[0] - P[19][1]*SK_MZ[2] + P[19][2]*SK_MZ[3] + P[19][18]*SK_MZ[1] + P[19][16]*SK_MZ[5] - P[19][17]*SK_MZ[4]);
    Kfusion[20] = SK_MZ[0]*(P[20][21] + P[20][0]*SH_MAG[1] + P[20][3]*SH_MAG[0] - P[20][1]*SK_MZ[2] + P[20][2]*SK_MZ[3] + P[20][18]*SK_MZ[1] + P[20][16]*SK_MZ[5] - P[20][17]*SK_MZ[4]);
    Kfusion[21] = SK_MZ[0]*(P[21][21] + P[21][0]*SH_MAG[1] + P[21][3]*SH_MAG[0] - P[21][1]*SK_MZ[2] + P[21][2]*SK_MZ[3] + P[21][18]*SK_MZ[1] + P[21][16]*SK_MZ[5] - P[21][17]*SK_MZ[4]);
    Some(temp)
}
