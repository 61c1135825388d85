// Velocity, position and height fusion.
//
// GPS velocity, GPS horizontal position and baro height are fused as up to
// six sequential scalar observations. Sequential fusion assumes the
// component errors are uncorrelated, which is not strictly true, but without
// covariance data from the receiver it is the only assumption available and
// it is much cheaper than a vector update. Each observation is a direct
// observation of a single state, so the Kalman gain is a single covariance
// column scaled by the innovation variance.

use log::{debug, warn};

use crate::config::{GPS_MODE_VEL2D, GPS_MODE_VEL3D};
use crate::maths::sq;

use super::{
    NavEkf, DT_VEL_POS, GPS_D_VEL_VAR_ACC_SCALE, GPS_NE_VEL_VAR_ACC_SCALE,
    GPS_POS_VAR_ACC_SCALE, GPS_RETRY_TIME_NO_TAS, GPS_RETRY_TIME_USE_TAS, HGT_RETRY_TIME_MODE0,
    HGT_RETRY_TIME_MODE12, MSEC_HGT_AVG,
};

impl NavEkf {
    pub(super) fn fuse_vel_pos_ned(&mut self) {
        self.vel_health = false;
        self.pos_health = false;
        self.hgt_health = false;

        let mut vel_innov = [0.0_f64; 3];
        let mut vel_innov1 = [0.0_f64; 3];
        let mut vel_innov2 = [0.0_f64; 3];
        let mut fuse_data = [false; 6];

        if !(self.fuse_vel_data || self.fuse_pos_data || self.fuse_hgt_data) {
            return;
        }

        // In static mode the predicted measurement comes from the current
        // states: there may be no stored history because there are no real
        // measurements, and only position and height fusion runs.
        if self.static_mode {
            self.states_at_pos_time = self.state;
            self.states_at_hgt_time = self.state;
        }

        let gps_retry_time = if self.use_airspeed() {
            GPS_RETRY_TIME_USE_TAS
        } else {
            GPS_RETRY_TIME_NO_TAS
        };

        // observation vector; velocity and horizontal position are forced
        // to zero in static mode
        let mut observation = [0.0_f64; 6];
        if !self.static_mode {
            observation[0] = self.vel_ned.x;
            observation[1] = self.vel_ned.y;
            observation[2] = self.vel_ned.z;
            observation[3] = self.gps_pos_ne.x + self.gps_pos_glitch_offset_ne.x;
            observation[4] = self.gps_pos_ne.y + self.gps_pos_glitch_offset_ne.y;
        }
        observation[5] = -self.hgt_mea;

        // additional error in the GPS measurements caused by manoeuvring
        let ne_vel_err = GPS_NE_VEL_VAR_ACC_SCALE * self.acc_nav_mag;
        let d_vel_err = GPS_D_VEL_VAR_ACC_SCALE * self.acc_nav_mag;
        let pos_err = GPS_POS_VAR_ACC_SCALE * self.acc_nav_mag;

        let mut r_obs = [0.0_f64; 6];
        r_obs[0] = sq(self.config.gps_horiz_vel_noise.clamp(0.05, 5.0)) + sq(ne_vel_err);
        r_obs[1] = r_obs[0];
        r_obs[2] = sq(self.config.gps_vert_vel_noise.clamp(0.05, 5.0)) + sq(d_vel_err);
        r_obs[3] = sq(self.config.gps_horiz_pos_noise.clamp(0.1, 10.0)) + sq(pos_err);
        r_obs[4] = r_obs[3];
        r_obs[5] = sq(self.config.baro_alt_noise.clamp(0.1, 10.0));

        // If GPS vertical velocity and baro innovations agree in sign and
        // are both far out of bounds, accelerometer aliasing is the likely
        // cause, and failing the consistency checks would make it worse by
        // removing the measurements that keep the filter from resonating.
        let mut bad_imu_data = false;
        if self.fusion_mode_gps == GPS_MODE_VEL3D
            && self.fuse_vel_data
            && self.imu_sample_time_ms.saturating_sub(self.last_hgt_time_ms) < 2 * MSEC_HGT_AVG
        {
            let hgt_err = self.states_at_hgt_time.position().z - observation[5];
            let vel_d_err = self.states_at_vel_time.velocity().z - observation[2];
            bad_imu_data = hgt_err * vel_d_err > 0.0
                && sq(hgt_err) > 9.0 * (self.p[9][9] + r_obs[5])
                && sq(vel_d_err) > 9.0 * (self.p[6][6] + r_obs[2]);
            if bad_imu_data {
                warn!("baro and GPS vertical velocity disagree with IMU, gates bypassed");
            }
        }

        // ── horizontal position consistency ──
        if self.fuse_pos_data {
            let pos_innov = [
                self.states_at_pos_time.position().x - observation[3],
                self.states_at_pos_time.position().y - observation[4],
            ];
            self.var_innov_vel_pos[3] = self.p[7][7] + r_obs[3];
            self.var_innov_vel_pos[4] = self.p[8][8] + r_obs[4];
            // the valid envelope grows quadratically with time since the
            // last good fix, scaled by the glitch acceleration limit
            let accel_scale = 1.0 + 0.1 * self.acc_nav_mag;
            let fail_time_s =
                0.001 * self.imu_sample_time_ms.saturating_sub(self.pos_fail_time) as f64;
            let max_pos_innov2 = sq(self.config.gps_pos_innov_gate
                * self.config.gps_horiz_pos_noise
                + 0.005 * accel_scale * self.config.glitch_accel_max * sq(fail_time_s));
            self.pos_test_ratio = (sq(pos_innov[0]) + sq(pos_innov[1])) / max_pos_innov2;
            self.pos_health = self.pos_test_ratio < 1.0 || bad_imu_data;
            self.pos_timeout =
                self.imu_sample_time_ms.saturating_sub(self.pos_fail_time) > gps_retry_time;
            if self.pos_health || self.pos_timeout || self.static_mode {
                self.pos_health = true;
                self.pos_fail_time = self.imu_sample_time_ms;
                // a timed-out or glitch-radius-exceeding jump is absorbed
                // into the offset instead of dragging the filter sideways
                if self.pos_timeout
                    || max_pos_innov2 > sq(self.config.glitch_radius_max)
                {
                    debug!(
                        "GPS glitch offset engaged, innovation ({:.1}, {:.1}) m",
                        pos_innov[0], pos_innov[1]
                    );
                    self.gps_pos_glitch_offset_ne.x += pos_innov[0];
                    self.gps_pos_glitch_offset_ne.y += pos_innov[1];
                    self.decay_gps_offset();
                    self.reset_position();
                    self.fuse_pos_data = false;
                }
            } else {
                self.pos_health = false;
            }
        }

        // ── velocity consistency ──
        if self.fuse_vel_data {
            let imax = if self.fusion_mode_gps == GPS_MODE_VEL2D { 1 } else { 2 };
            let mut k1 = 0.0; // innovation-to-error ratio for IMU1
            let mut k2 = 0.0; // innovation-to-error ratio for IMU2
            let mut innov_vel_sum_sq = 0.0;
            let mut var_vel_sum = 0.0;
            for i in 0..=imax {
                let state_index = i + 4;
                vel_innov[i] = self.states_at_vel_time.velocity()[i] - observation[i];
                vel_innov1[i] = self.states_at_vel_time.vel1()[i] - observation[i];
                vel_innov2[i] = self.states_at_vel_time.vel2()[i] - observation[i];
                self.var_innov_vel_pos[i] = self.p[state_index][state_index] + r_obs[i];
                // error weightings for the single-IMU states, normalised by
                // the observation error
                let r_comp = if i == 2 {
                    sq(self.config.gps_vert_vel_noise.clamp(0.05, 5.0))
                } else {
                    sq(self.config.gps_horiz_vel_noise.clamp(0.05, 5.0))
                };
                k1 += r_comp / (r_comp + sq(vel_innov1[i]));
                k2 += r_comp / (r_comp + sq(vel_innov2[i]));
                innov_vel_sum_sq += sq(vel_innov[i]);
                var_vel_sum += self.var_innov_vel_pos[i];
            }
            // weighting used to blend the accelerometers; detects and
            // compensates aliasing on one of them
            self.imu1_weighting = k1 / (k1 + k2);
            self.vel_test_ratio =
                innov_vel_sum_sq / (var_vel_sum * sq(self.config.gps_vel_innov_gate));
            self.vel_health = self.vel_test_ratio < 1.0 || bad_imu_data;
            self.vel_timeout =
                self.imu_sample_time_ms.saturating_sub(self.vel_fail_time) > gps_retry_time;
            if self.vel_health || self.static_mode {
                self.vel_health = true;
                self.vel_fail_time = self.imu_sample_time_ms;
            } else if self.vel_timeout && !self.pos_health {
                // velocity has been unusable for too long with nothing else
                // holding the solution; rebase it and skip this cycle
                warn!("GPS velocity timeout, resetting velocity states");
                self.reset_velocity();
                self.history.reset(&self.state, self.imu_sample_time_ms);
                self.fuse_vel_data = false;
            } else {
                self.vel_health = false;
            }
        }

        // ── height consistency ──
        if self.fuse_hgt_data {
            let hgt_retry_time = if self.fusion_mode_gps == GPS_MODE_VEL3D {
                HGT_RETRY_TIME_MODE0
            } else {
                HGT_RETRY_TIME_MODE12
            };
            let hgt_innov = self.states_at_hgt_time.position().z - observation[5];
            self.var_innov_vel_pos[5] = self.p[9][9] + r_obs[5];
            self.hgt_test_ratio =
                sq(hgt_innov) / (sq(self.config.hgt_innov_gate) * self.var_innov_vel_pos[5]);
            self.hgt_health = self.hgt_test_ratio < 1.0 || bad_imu_data;
            self.hgt_timeout =
                self.imu_sample_time_ms.saturating_sub(self.hgt_fail_time) > hgt_retry_time;
            if self.hgt_health || self.hgt_timeout || self.static_mode {
                self.hgt_health = true;
                self.hgt_fail_time = self.imu_sample_time_ms;
                if self.hgt_timeout {
                    warn!("height measurement timeout, resetting height states");
                    self.reset_height();
                    self.history.reset(&self.state, self.imu_sample_time_ms);
                    self.fuse_hgt_data = false;
                }
            } else {
                self.hgt_health = false;
            }
        }

        // choose which observations to fuse this cycle
        if self.fuse_vel_data
            && self.fusion_mode_gps == GPS_MODE_VEL3D
            && self.vel_health
            && !self.static_mode
        {
            fuse_data[0] = true;
            fuse_data[1] = true;
            fuse_data[2] = true;
        }
        if self.fuse_vel_data
            && self.fusion_mode_gps == GPS_MODE_VEL2D
            && self.vel_health
            && !self.static_mode
        {
            fuse_data[0] = true;
            fuse_data[1] = true;
        }
        if (self.fuse_pos_data && self.pos_health) || self.static_mode {
            fuse_data[3] = true;
            fuse_data[4] = true;
        }
        if (self.fuse_hgt_data && self.hgt_health) || self.static_mode {
            fuse_data[5] = true;
        }

        // ── sequential scalar fusion ──
        for obs_index in 0..6 {
            if !fuse_data[obs_index] {
                continue;
            }
            let state_index = 4 + obs_index;

            // innovation against the replay-aligned states, with the GPS
            // noise scaled up when the satellite count is marginal
            if obs_index <= 2 {
                self.innov_vel_pos[obs_index] =
                    self.states_at_vel_time.velocity()[obs_index] - observation[obs_index];
                r_obs[obs_index] *= sq(self.gps_noise_scaler);
            } else if obs_index == 3 || obs_index == 4 {
                self.innov_vel_pos[obs_index] =
                    self.states_at_pos_time.position()[obs_index - 3] - observation[obs_index];
                r_obs[obs_index] *= sq(self.gps_noise_scaler);
            } else {
                self.innov_vel_pos[obs_index] =
                    self.states_at_hgt_time.position()[obs_index - 3] - observation[obs_index];
            }

            self.var_innov_vel_pos[obs_index] =
                self.p[state_index][state_index] + r_obs[obs_index];
            let sk = 1.0 / self.var_innov_vel_pos[obs_index];
            let mut kfusion = [0.0_f64; 31];
            for (i, k) in kfusion.iter_mut().enumerate().take(13) {
                *k = self.p[i][state_index] * sk;
            }
            // Only height observations update the Z accel bias, and not
            // when tilted past 60 degrees where scale factor errors
            // dominate. The gain is clamped to keep it from fighting the
            // height state.
            if obs_index == 5 && self.prev_tnb[(2, 2)] > 0.5 {
                kfusion[13] = (self.p[13][state_index] * sk).clamp(-1.0, 0.0);
            } else {
                kfusion[13] = 0.0;
            }
            if !self.inhibit_wind_states {
                kfusion[14] = self.p[14][state_index] * sk;
                kfusion[15] = self.p[15][state_index] * sk;
            }
            if !self.inhibit_mag_states {
                for i in 16..=21 {
                    kfusion[i] = self.p[i][state_index] * sk;
                }
            }
            // gains for the single-IMU states mirror the blended ones
            kfusion[22] = kfusion[13]; // IMU2 Z accel bias
            kfusion[26] = kfusion[9]; // IMU1 down position
            kfusion[30] = kfusion[9]; // IMU2 down position
            for i in 0..=2 {
                kfusion[i + 23] = kfusion[i + 4]; // IMU1 NED velocity
                kfusion[i + 27] = kfusion[i + 4]; // IMU2 NED velocity
            }

            // correct the states predicted from single (not blended) IMU data
            if obs_index == 5 {
                let hgt_innov1 = self.states_at_hgt_time.pos_d1() - observation[obs_index];
                let hgt_innov2 = self.states_at_hgt_time.pos_d2() - observation[obs_index];
                // limit the bias rate of change so wind shear cannot be
                // mistaken for Z accel bias
                let correction_limit = 0.02 * self.dt_imu * DT_VEL_POS;
                let zbias1 = self.state.accel_zbias1()
                    - (kfusion[13] * hgt_innov1).clamp(-correction_limit, correction_limit);
                self.state.set_accel_zbias1(zbias1);
                let zbias2 = self.state.accel_zbias2()
                    - (kfusion[22] * hgt_innov2).clamp(-correction_limit, correction_limit);
                self.state.set_accel_zbias2(zbias2);
                for i in 23..=26 {
                    self.state[i] -= kfusion[i] * hgt_innov1;
                }
                for i in 27..=30 {
                    self.state[i] -= kfusion[i] * hgt_innov2;
                }
            } else if obs_index <= 2 {
                for i in 23..=26 {
                    self.state[i] -= kfusion[i] * vel_innov1[obs_index];
                }
                for i in 27..=30 {
                    self.state[i] -= kfusion[i] * vel_innov2[obs_index];
                }
            }

            // Attitude, velocity and position corrections are spread across
            // the prediction cycles between now and the next expected
            // measurement to suppress output pulsing at the measurement
            // rate. Quaternion corrections apply immediately when the total
            // rotation over the spreading window would exceed 0.1 rad.
            let high_rates =
                self.gps_update_count_max as f64 * self.corrected_del_ang.norm() > 0.1;
            for i in 0..=21 {
                if (i <= 3 && high_rates) || i >= 10 || self.static_mode {
                    self.state[i] -= kfusion[i] * self.innov_vel_pos[obs_index];
                } else if obs_index == 5 {
                    self.hgt_incr_state_delta[i] -= kfusion[i]
                        * self.innov_vel_pos[obs_index]
                        * self.hgt_update_count_max_inv;
                } else {
                    self.gps_incr_state_delta[i] -= kfusion[i]
                        * self.innov_vel_pos[obs_index]
                        * self.gps_update_count_max_inv;
                }
            }
            self.state.normalize_quat();

            // covariance update for a direct observation of one state:
            // P = (I - K*H)*P collapses to subtracting K times one row
            let mut khp = [[0.0_f64; 22]; 22];
            for (i, khp_row) in khp.iter_mut().enumerate() {
                for (j, khp_val) in khp_row.iter_mut().enumerate() {
                    *khp_val = kfusion[i] * self.p[state_index][j];
                }
            }
            for i in 0..=21 {
                for j in 0..=21 {
                    self.p[i][j] -= khp[i][j];
                }
            }
        }

        self.force_symmetry();
        self.constrain_variances();
    }
}

#[cfg(test)]
mod tests {
    use super::super::NavEkf;
    use crate::config::EkfConfig;
    use crate::types::{BaroSample, GeoPosition, GpsFix, ImuSample};
    use nalgebra::Vector3;

    const G: f64 = 9.80665;
    const HOME: GeoPosition = GeoPosition { latitude: 47.0, longitude: 8.0, altitude: 0.0 };

    fn level_imu(t_ms: u64, dt: f64) -> ImuSample {
        ImuSample {
            timestamp_ms: t_ms,
            dt,
            accel1: (0.0, 0.0, -G),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        }
    }

    fn gps_at(t_ms: u64, vel: (f64, f64, f64)) -> GpsFix {
        GpsFix {
            timestamp_ms: t_ms,
            fix_3d: true,
            latitude: 47.0,
            longitude: 8.0,
            vel_ned: vel,
            num_sats: 8,
            have_vertical_velocity: true,
        }
    }

    /// Drive the filter on the ground in static mode; position and velocity
    /// stay pinned near zero even with small accelerometer noise.
    #[test]
    fn static_mode_holds_position_and_velocity() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_home(HOME);
        ekf.set_vehicle_status(false, true); // disarmed -> static mode
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        for k in 1..2000u64 {
            let t = k * 3;
            let mut imu = level_imu(t, 0.0025);
            imu.accel1 = (0.02, -0.015, -G + 0.03);
            ekf.push_baro(BaroSample { timestamp_ms: t, altitude: 0.0 });
            ekf.update(&imu);
        }
        assert!(ekf.state.position().norm() < 0.5, "position drifted in static mode");
        assert!(ekf.state.velocity().norm() < 0.5, "velocity drifted in static mode");
    }

    /// GPS velocity fusion pulls the filter velocity toward the measurement.
    #[test]
    fn gps_velocity_is_tracked_in_flight() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_home(HOME);
        ekf.set_vehicle_status(true, true);
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        // feed a first fix so the reset paths see valid data
        ekf.push_gps(gps_at(0, (0.0, 5.0, 0.0)));
        let mut t = 0u64;
        for k in 1..4000u64 {
            t = k * 3;
            if t % 200 < 3 {
                ekf.push_gps(gps_at(t, (0.0, 5.0, 0.0)));
            }
            if t % 100 < 3 {
                ekf.push_baro(BaroSample { timestamp_ms: t, altitude: 0.0 });
            }
            ekf.update(&level_imu(t, 0.0025));
        }
        let vel = ekf.state.velocity();
        assert!(
            (vel - Vector3::new(0.0, 5.0, 0.0)).norm() < 1.0,
            "velocity {:?} did not converge to GPS",
            vel
        );
        assert!(t > 0);
    }

    /// The dual-IMU weighting stays at an even blend when both IMUs agree.
    #[test]
    fn imu_weighting_is_balanced_for_matched_imus() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_home(HOME);
        ekf.set_vehicle_status(true, true);
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        ekf.push_gps(gps_at(0, (0.0, 0.0, 0.0)));
        for k in 1..1000u64 {
            let t = k * 3;
            if t % 200 < 3 {
                ekf.push_gps(gps_at(t, (0.0, 0.0, 0.0)));
            }
            ekf.update(&level_imu(t, 0.0025));
        }
        assert!((ekf.imu1_weighting - 0.5).abs() < 0.05);
    }
}
