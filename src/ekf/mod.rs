// 22-state navigation EKF.
//
// The filter is driven by one entry point, [`NavEkf::update`], called once
// per IMU sample. Measurements from the slower sensors are pushed in
// whenever they arrive and are picked up, delay-compensated against the
// state history, on the next update. Within one update the order is fixed:
// strapdown integration, history store, covariance prediction (when the
// accumulated angle or time triggers it), then vel/pos/height, magnetometer,
// airspeed and sideslip fusion, each with its own consistency gating.
//
// All failure handling is internal: gate rejections, ill-conditioned fusion
// steps, measurement timeouts, IMU stalls and filter divergence end in
// resets or fault flags, never in an error returned to the caller.

mod covariance;
mod fuse_airspeed;
mod fuse_mag;
mod fuse_sideslip;
mod fuse_velpos;
mod history;
mod state;

pub use history::StateHistory;
pub use state::{StateVector, NUM_COVARIED, NUM_STATES};

use log::{debug, warn};
use nalgebra::{Matrix3, Vector2, Vector3};

use crate::config::{EkfConfig, MagCalMode, GPS_MODE_VEL2D, GPS_MODE_VEL3D, GPS_MODE_POS_ONLY};
use crate::maths::{latlon_to_ne, quat_rotate, sq, Quat};
use crate::outputs::FaultStatus;
use crate::types::{AirspeedSample, BaroSample, GeoPosition, GpsFix, ImuSample, MagSample};

use fuse_mag::MagFusionState;

/// Covariance storage for the 22 covaried states. A fixed array rather
/// than a general matrix type: the prediction step is a closed-form sparse
/// expansion, so nothing would use general matrix operations.
pub type Matrix22 = [[f64; NUM_COVARIED]; NUM_COVARIED];

// ─── Fixed tuning ────────────────────────────────────────────────────────────

/// Earth rotation rate (rad/s)
const EARTH_RATE: f64 = 7.2921e-5;
/// NED gravity magnitude (m/s^2)
const GRAVITY_MSS: f64 = 9.80665;
/// Divergence limit for any covariance element
const EKF_COVARIANCE_MAX: f64 = 1.0e8;
/// Wind speed assumed at launch when no airspeed sensor is fitted (m/s)
const STARTUP_WIND_SPEED: f64 = 3.0;
/// Initial gyro bias uncertainty (deg/s)
const INIT_GYRO_BIAS_UNCERTAINTY: f64 = 0.1;

/// Maximum time between covariance prediction updates (s)
const COV_TIME_STEP_MAX: f64 = 0.07;
/// Maximum delta angle between covariance prediction updates (rad)
const COV_DEL_ANG_MAX: f64 = 0.05;
/// Maximum interval between airspeed fusion updates (ms)
const TAS_MSEC_MAX: u64 = 200;

/// Scale factor applied to NE velocity measurement variance due to manoeuvre
/// acceleration
const GPS_NE_VEL_VAR_ACC_SCALE: f64 = 0.05;
/// Scale factor applied to vertical velocity measurement variance due to
/// manoeuvre acceleration
const GPS_D_VEL_VAR_ACC_SCALE: f64 = 0.07;
/// Scale factor applied to horizontal position measurement variance due to
/// manoeuvre acceleration
const GPS_POS_VAR_ACC_SCALE: f64 = 0.05;
/// GPS retry time with airspeed measurements (ms)
const GPS_RETRY_TIME_USE_TAS: u64 = 20_000;
/// GPS retry time without airspeed measurements (ms)
const GPS_RETRY_TIME_NO_TAS: u64 = 10_000;
/// Height retry time with vertical velocity measurement (ms)
const HGT_RETRY_TIME_MODE0: u64 = 10_000;
/// Height retry time without vertical velocity measurement (ms)
const HGT_RETRY_TIME_MODE12: u64 = 5_000;
/// Time before a magnetometer failing consistency checks is declared failed (ms)
const MAG_FAIL_TIME_LIMIT_MS: u64 = 10_000;
/// Scale factor applied to magnetometer variance due to angular rate
const MAG_VAR_RATE_SCALE: f64 = 0.05;
/// Scale factor applied to gyro bias process noise when on ground
const GYRO_BIAS_NOISE_SCALER: f64 = 2.0;
/// Average interval between GPS measurements (ms)
const MSEC_GPS_AVG: u64 = 200;
/// Average interval between height measurements (ms)
const MSEC_HGT_AVG: u64 = 100;
/// Average interval between magnetometer measurements (ms)
const MSEC_MAG_AVG: u64 = 100;
/// Average interval between synthetic sideslip measurements (ms)
const MSEC_BETA_AVG: u64 = 100;
/// Interval between position and velocity corrections (s)
const DT_VEL_POS: f64 = 0.02;

// ─── Filter ──────────────────────────────────────────────────────────────────

pub struct NavEkf {
    pub(crate) config: EkfConfig,

    // state and covariance
    state: StateVector,
    states_initialised: bool,
    p: Matrix22,
    next_p: Matrix22,
    process_noise: [f64; 22],
    history: StateHistory,

    // IMU pre-processing
    imu_sample_time_ms: u64,
    dt_imu: f64,
    last_imu: Option<ImuSample>,
    last_ang_rate: Vector3<f64>,
    last_accel1: Vector3<f64>,
    last_accel2: Vector3<f64>,
    d_ang_imu: Vector3<f64>,
    d_vel_imu1: Vector3<f64>,
    d_vel_imu2: Vector3<f64>,

    // strapdown intermediates
    corrected_del_ang: Vector3<f64>,
    corrected_del_vel1: Vector3<f64>,
    corrected_del_vel2: Vector3<f64>,
    corrected_del_vel12: Vector3<f64>,
    prev_del_ang: Vector3<f64>,
    prev_tnb: Matrix3<f64>,
    earth_rate_ned: Vector3<f64>,
    vel_dot_ned: Vector3<f64>,
    vel_dot_ned_filt: Vector3<f64>,
    acc_nav_mag: f64,
    acc_nav_mag_horiz: f64,
    imu1_weighting: f64,

    // covariance prediction scheduling
    summed_del_ang: Vector3<f64>,
    summed_del_vel: Vector3<f64>,
    dt_sum: f64,
    cov_pred_step: bool,
    hgt_rate: f64,

    // latest pushed measurements
    latest_gps: Option<GpsFix>,
    latest_baro: Option<BaroSample>,
    latest_mag: Option<MagSample>,
    latest_airspeed: Option<AirspeedSample>,

    // ingested measurement data
    vel_ned: Vector3<f64>,
    gps_pos_ne: Vector2<f64>,
    gps_pos_glitch_offset_ne: Vector2<f64>,
    gps_noise_scaler: f64,
    gps_fix_ok: bool,
    hgt_mea: f64,
    mag_data: Vector3<f64>,
    mag_bias: Vector3<f64>,
    vtas_meas: f64,
    eas2tas: f64,
    new_data_gps: bool,
    new_data_hgt: bool,
    new_data_mag: bool,
    new_data_tas: bool,
    fusion_mode_gps: u8,

    // states recalled at measurement time
    states_at_vel_time: StateVector,
    states_at_pos_time: StateVector,
    states_at_hgt_time: StateVector,
    states_at_mag_meas_time: StateVector,
    states_at_vtas_meas_time: StateVector,

    // timers (monotonic ms, shared IMU clock)
    last_fix_time_ms: u64,
    second_last_fix_time_ms: u64,
    last_hgt_meas_time: u64,
    last_hgt_time_ms: u64,
    last_mag_update: u64,
    last_airspeed_update: u64,
    tas_msec_prev: u64,
    beta_msec_prev: u64,
    last_decay_time_ms: u64,
    vel_fail_time: u64,
    pos_fail_time: u64,
    hgt_fail_time: u64,
    last_healthy_mag_time_ms: u64,
    last_diverge_time_ms: u64,

    // fusion control
    fuse_vel_data: bool,
    fuse_pos_data: bool,
    fuse_hgt_data: bool,
    fuse_mag_data: bool,
    tas_data_waiting: bool,
    mag_fuse_performed: bool,
    mag_fuse_required: bool,
    mag_state: MagFusionState,

    // correction spreading
    gps_update_count: u32,
    gps_update_count_max: u32,
    gps_update_count_max_inv: f64,
    hgt_update_count: u32,
    hgt_update_count_max: u32,
    hgt_update_count_max_inv: f64,
    mag_update_count: u32,
    mag_update_count_max: u32,
    mag_update_count_max_inv: f64,
    gps_incr_state_delta: [f64; 10],
    hgt_incr_state_delta: [f64; 10],
    mag_incr_state_delta: [f64; 10],

    // health and fault tracking
    vel_health: bool,
    pos_health: bool,
    hgt_health: bool,
    vel_timeout: bool,
    pos_timeout: bool,
    hgt_timeout: bool,
    mag_health: bool,
    mag_timeout: bool,
    mag_failed: bool,
    filter_diverged: bool,
    scaled_delta_gyr_bias_lgth: f64,
    last_gyro_bias: Vector3<f64>,
    fault_status: FaultStatus,

    // innovations and consistency ratios
    innov_vel_pos: [f64; 6],
    var_innov_vel_pos: [f64; 6],
    innov_mag: [f64; 3],
    var_innov_mag: [f64; 3],
    innov_vtas: f64,
    var_innov_vtas: f64,
    vel_test_ratio: f64,
    pos_test_ratio: f64,
    hgt_test_ratio: f64,
    mag_test_ratio: [f64; 3],
    tas_test_ratio: f64,

    // operating modes
    static_mode: bool,
    prev_static_mode: bool,
    on_ground: bool,
    prev_on_ground: bool,
    yaw_aligned: bool,
    inhibit_wind_states: bool,
    inhibit_mag_states: bool,

    // host-supplied context
    home: GeoPosition,
    trim: Vector3<f64>,
    mag_declination: f64,
    compass_enabled: bool,
    airspeed_enabled: bool,
    armed: bool,
    correct_centrifugal: bool,
    attitude_ref_roll: f64,
    attitude_ref_pitch: f64,
}

impl NavEkf {
    pub fn new(config: EkfConfig) -> Self {
        let fusion_mode_gps = config.gps_fusion_mode.min(GPS_MODE_POS_ONLY);
        NavEkf {
            config,
            state: StateVector::default(),
            states_initialised: false,
            p: [[0.0; 22]; 22],
            next_p: [[0.0; 22]; 22],
            process_noise: [0.0; 22],
            history: StateHistory::default(),
            imu_sample_time_ms: 0,
            dt_imu: 0.0,
            last_imu: None,
            last_ang_rate: Vector3::zeros(),
            last_accel1: Vector3::zeros(),
            last_accel2: Vector3::zeros(),
            d_ang_imu: Vector3::zeros(),
            d_vel_imu1: Vector3::zeros(),
            d_vel_imu2: Vector3::zeros(),
            corrected_del_ang: Vector3::zeros(),
            corrected_del_vel1: Vector3::zeros(),
            corrected_del_vel2: Vector3::zeros(),
            corrected_del_vel12: Vector3::zeros(),
            prev_del_ang: Vector3::zeros(),
            prev_tnb: Matrix3::zeros(),
            earth_rate_ned: Vector3::zeros(),
            vel_dot_ned: Vector3::zeros(),
            vel_dot_ned_filt: Vector3::zeros(),
            acc_nav_mag: 0.0,
            acc_nav_mag_horiz: 0.0,
            imu1_weighting: 0.5,
            summed_del_ang: Vector3::zeros(),
            summed_del_vel: Vector3::zeros(),
            dt_sum: 0.0,
            cov_pred_step: false,
            hgt_rate: 0.0,
            latest_gps: None,
            latest_baro: None,
            latest_mag: None,
            latest_airspeed: None,
            vel_ned: Vector3::zeros(),
            gps_pos_ne: Vector2::zeros(),
            gps_pos_glitch_offset_ne: Vector2::zeros(),
            gps_noise_scaler: 1.0,
            gps_fix_ok: false,
            hgt_mea: 0.0,
            mag_data: Vector3::zeros(),
            mag_bias: Vector3::zeros(),
            vtas_meas: 0.0,
            eas2tas: 1.0,
            new_data_gps: false,
            new_data_hgt: false,
            new_data_mag: false,
            new_data_tas: false,
            fusion_mode_gps,
            states_at_vel_time: StateVector::default(),
            states_at_pos_time: StateVector::default(),
            states_at_hgt_time: StateVector::default(),
            states_at_mag_meas_time: StateVector::default(),
            states_at_vtas_meas_time: StateVector::default(),
            last_fix_time_ms: 0,
            second_last_fix_time_ms: 0,
            last_hgt_meas_time: 0,
            last_hgt_time_ms: 0,
            last_mag_update: 0,
            last_airspeed_update: 0,
            tas_msec_prev: 0,
            beta_msec_prev: 0,
            last_decay_time_ms: 0,
            vel_fail_time: 0,
            pos_fail_time: 0,
            hgt_fail_time: 0,
            last_healthy_mag_time_ms: 0,
            last_diverge_time_ms: 0,
            fuse_vel_data: false,
            fuse_pos_data: false,
            fuse_hgt_data: false,
            fuse_mag_data: false,
            tas_data_waiting: false,
            mag_fuse_performed: false,
            mag_fuse_required: false,
            mag_state: MagFusionState::default(),
            gps_update_count: 0,
            gps_update_count_max: 1,
            gps_update_count_max_inv: 1.0,
            hgt_update_count: 0,
            hgt_update_count_max: 1,
            hgt_update_count_max_inv: 1.0,
            mag_update_count: 0,
            mag_update_count_max: 1,
            mag_update_count_max_inv: 1.0,
            gps_incr_state_delta: [0.0; 10],
            hgt_incr_state_delta: [0.0; 10],
            mag_incr_state_delta: [0.0; 10],
            vel_health: false,
            pos_health: false,
            hgt_health: false,
            vel_timeout: false,
            pos_timeout: false,
            hgt_timeout: false,
            mag_health: false,
            mag_timeout: false,
            mag_failed: false,
            filter_diverged: false,
            scaled_delta_gyr_bias_lgth: 0.0,
            last_gyro_bias: Vector3::zeros(),
            fault_status: FaultStatus::default(),
            innov_vel_pos: [0.0; 6],
            var_innov_vel_pos: [0.0; 6],
            innov_mag: [0.0; 3],
            var_innov_mag: [0.0; 3],
            innov_vtas: 0.0,
            var_innov_vtas: 0.0,
            vel_test_ratio: 0.0,
            pos_test_ratio: 0.0,
            hgt_test_ratio: 0.0,
            mag_test_ratio: [0.0; 3],
            tas_test_ratio: 0.0,
            static_mode: true,
            prev_static_mode: true,
            on_ground: true,
            prev_on_ground: true,
            yaw_aligned: false,
            inhibit_wind_states: true,
            inhibit_mag_states: true,
            home: GeoPosition::default(),
            trim: Vector3::zeros(),
            mag_declination: 0.0,
            compass_enabled: false,
            airspeed_enabled: false,
            armed: false,
            correct_centrifugal: true,
            attitude_ref_roll: 0.0,
            attitude_ref_pitch: 0.0,
        }
    }

    // ─── Host context ────────────────────────────────────────────────────────

    pub fn set_home(&mut self, home: GeoPosition) {
        self.home = home;
    }

    /// AHRS trim offsets removed from the Euler output (rad).
    pub fn set_trim(&mut self, trim: (f64, f64, f64)) {
        self.trim = Vector3::new(trim.0, trim.1, trim.2);
    }

    pub fn set_mag_declination(&mut self, declination_rad: f64) {
        self.mag_declination = declination_rad;
    }

    pub fn set_compass_use(&mut self, enabled: bool) {
        self.compass_enabled = enabled;
    }

    pub fn set_airspeed_use(&mut self, enabled: bool) {
        self.airspeed_enabled = enabled;
    }

    /// Arming and centrifugal-correction status from the vehicle code.
    /// Static mode is demanded whenever either is off.
    pub fn set_vehicle_status(&mut self, armed: bool, correct_centrifugal: bool) {
        self.armed = armed;
        self.correct_centrifugal = correct_centrifugal;
    }

    /// Roll and pitch from the fallback attitude reference, consumed by the
    /// dynamic initialisation and reset paths.
    pub fn set_attitude_reference(&mut self, roll: f64, pitch: f64) {
        self.attitude_ref_roll = roll;
        self.attitude_ref_pitch = pitch;
    }

    // ─── Measurement pushes ──────────────────────────────────────────────────

    pub fn push_gps(&mut self, fix: GpsFix) {
        self.latest_gps = Some(fix);
    }

    pub fn push_baro(&mut self, sample: BaroSample) {
        self.latest_baro = Some(sample);
    }

    pub fn push_mag(&mut self, sample: MagSample) {
        self.latest_mag = Some(sample);
    }

    pub fn push_airspeed(&mut self, sample: AirspeedSample) {
        self.latest_airspeed = Some(sample);
    }

    // ─── Initialisation ──────────────────────────────────────────────────────

    /// Initialise from accelerometer tilt and magnetometer heading. Only
    /// valid with the vehicle at rest.
    pub fn initialise_filter_bootstrap(&mut self, imu: &ImuSample) {
        self.zero_variables(imu.timestamp_ms);
        self.last_imu = Some(*imu);
        self.dt_imu = imu.dt.clamp(0.001, 1.0);
        self.init_update_counts();

        // level attitude from the measured specific force
        let mut accel = imu.accel1_vec();
        let (mut roll, mut pitch) = (0.0, 0.0);
        if accel.norm() > 0.001 {
            accel = accel.normalize();
            pitch = accel.x.clamp(-1.0, 1.0).asin();
            roll = -(accel.y / pitch.cos()).clamp(-1.0, 1.0).asin();
        }

        self.read_mag_data();
        let quat = self.calc_quat_and_field_states(roll, pitch);
        self.read_gps_data();
        self.read_hgt_data();
        self.set_flight_and_fusion_modes();

        self.state.set_quat(quat);
        self.state.set_gyro_bias(Vector3::zeros());
        self.state.set_accel_zbias1(0.0);
        self.state.set_accel_zbias2(0.0);
        self.state.set_wind_vel(Vector2::zeros());
        self.state.set_body_magfield(self.mag_bias);
        self.reset_velocity();
        self.reset_position();
        self.reset_height();

        self.states_initialised = true;
        self.covariance_init();
        self.earth_rate_ned = calc_earth_rate_ned(self.home.latitude);
        self.read_imu_data(imu);
        debug!("filter bootstrap complete, roll {:.3} pitch {:.3}", roll, pitch);
    }

    /// Initialise while moving, taking roll and pitch from the fallback
    /// attitude reference. Also the recovery path after divergence.
    pub fn initialise_filter_dynamic(&mut self) {
        let Some(imu) = self.last_imu else {
            // never been fed an IMU sample; nothing to initialise from
            return;
        };
        self.states_initialised = false;
        self.zero_variables(imu.timestamp_ms);
        self.dt_imu = imu.dt.clamp(0.001, 1.0);
        self.init_update_counts();

        let quat =
            self.calc_quat_and_field_states(self.attitude_ref_roll, self.attitude_ref_pitch);
        self.state.set_quat(quat);
        self.state.set_gyro_bias(Vector3::zeros());
        self.state.set_accel_zbias1(0.0);
        self.state.set_accel_zbias2(0.0);
        self.state.set_wind_vel(Vector2::zeros());
        self.reset_velocity();
        self.reset_position();
        self.reset_height();
        self.state.set_body_magfield(self.mag_bias);

        self.states_initialised = true;
        self.covariance_init();
        self.earth_rate_ned = calc_earth_rate_ned(self.home.latitude);
        self.read_imu_data(&imu);
        debug!("filter dynamic initialisation complete");
    }

    pub fn states_initialised(&self) -> bool {
        self.states_initialised
    }

    // number of frames over which GPS, height and magnetometer corrections
    // are spread to suppress output pulsing at the measurement rates
    fn init_update_counts(&mut self) {
        self.gps_update_count_max_inv = (self.dt_imu * 1000.0) / MSEC_GPS_AVG as f64;
        self.gps_update_count_max = (1.0 / self.gps_update_count_max_inv) as u32;
        self.hgt_update_count_max_inv = (self.dt_imu * 1000.0) / MSEC_HGT_AVG as f64;
        self.hgt_update_count_max = (1.0 / self.hgt_update_count_max_inv) as u32;
        self.mag_update_count_max_inv = (self.dt_imu * 1000.0) / MSEC_MAG_AVG as f64;
        self.mag_update_count_max = (1.0 / self.mag_update_count_max_inv) as u32;
    }

    fn zero_variables(&mut self, now_ms: u64) {
        self.imu_sample_time_ms = now_ms;
        self.last_healthy_mag_time_ms = now_ms;
        self.last_diverge_time_ms = now_ms;
        self.tas_msec_prev = now_ms;
        self.beta_msec_prev = now_ms;
        self.last_mag_update = now_ms;
        self.last_hgt_meas_time = now_ms;
        self.last_hgt_time_ms = now_ms;
        self.last_airspeed_update = now_ms;
        self.vel_fail_time = now_ms;
        self.pos_fail_time = now_ms;
        self.hgt_fail_time = now_ms;
        self.last_fix_time_ms = now_ms;
        self.second_last_fix_time_ms = now_ms;
        self.last_decay_time_ms = now_ms;

        self.gps_noise_scaler = 1.0;
        self.vel_timeout = false;
        self.pos_timeout = false;
        self.hgt_timeout = false;
        self.filter_diverged = false;
        self.mag_timeout = false;
        self.mag_failed = false;
        self.dt_imu = 0.0;
        self.dt_sum = 0.0;
        self.hgt_mea = 0.0;
        self.last_gyro_bias = Vector3::zeros();
        self.prev_del_ang = Vector3::zeros();
        self.last_ang_rate = Vector3::zeros();
        self.last_accel1 = Vector3::zeros();
        self.last_accel2 = Vector3::zeros();
        self.vel_dot_ned_filt = Vector3::zeros();
        self.summed_del_ang = Vector3::zeros();
        self.summed_del_vel = Vector3::zeros();
        self.vel_ned = Vector3::zeros();
        self.gps_pos_ne = Vector2::zeros();
        self.gps_pos_glitch_offset_ne = Vector2::zeros();
        self.prev_tnb = Matrix3::zeros();
        self.p = [[0.0; 22]; 22];
        self.next_p = [[0.0; 22]; 22];
        self.process_noise = [0.0; 22];
        self.history = StateHistory::default();
        self.gps_incr_state_delta = [0.0; 10];
        self.hgt_incr_state_delta = [0.0; 10];
        self.mag_incr_state_delta = [0.0; 10];
    }

    // ─── Main entry point ────────────────────────────────────────────────────

    /// Advance the filter by one IMU sample. This is the only routine that
    /// mutates the navigation solution; it must be called for every sample.
    pub fn update(&mut self, imu: &ImuSample) {
        if !self.states_initialised {
            return;
        }

        self.read_imu_data(imu);
        self.last_imu = Some(*imu);

        // a dt of zero carries no information and would upset the bias
        // constraint maths; treat the call as a no-op
        if imu.dt <= 0.0 {
            return;
        }

        // detect divergence and recover using the attitude reference
        self.check_divergence();
        if self.filter_diverged {
            warn!("filter diverged, re-initialising from attitude reference");
            self.initialise_filter_dynamic();
            return;
        }

        // an IMU stall leaves the strapdown solution unusable; rebase
        // velocity, position and height on fresh measurements
        if self.dt_imu > 0.2 {
            warn!("IMU stall of {:.3} s, resetting velocity/position/height", self.dt_imu);
            self.reset_velocity();
            self.reset_position();
            self.reset_height();
            self.history.reset(&self.state, self.imu_sample_time_ms);
            self.read_imu_data(imu);
            return;
        }

        self.set_flight_and_fusion_modes();

        // static mode fuses zero position and velocity so an attitude
        // reference can be maintained on the ground without GPS
        self.static_mode = self.static_mode_demanded();
        if self.prev_static_mode != self.static_mode {
            debug!("static mode changed to {}", self.static_mode);
            self.reset_velocity();
            self.reset_position();
            self.reset_height();
            self.history.reset(&self.state, self.imu_sample_time_ms);
            self.calc_quat_and_field_states(self.attitude_ref_roll, self.attitude_ref_pitch);
            self.prev_static_mode = self.static_mode;
        }

        self.update_strapdown_equations_ned();

        self.history.store(&self.state, self.imu_sample_time_ms);

        // accumulate the deltas consumed by the covariance prediction
        self.summed_del_ang += self.corrected_del_ang;
        self.summed_del_vel += self.corrected_del_vel1;
        self.dt_sum += self.dt_imu;

        // predict the covariance when the angle or time accumulated since
        // the last prediction would otherwise exceed the limits
        if self.dt_sum >= (COV_TIME_STEP_MAX - self.dt_imu)
            || self.summed_del_ang.norm() > COV_DEL_ANG_MAX
        {
            self.covariance_prediction();
            self.cov_pred_step = true;
            self.summed_del_ang = Vector3::zeros();
            self.summed_del_vel = Vector3::zeros();
            self.dt_sum = 0.0;
        } else {
            self.cov_pred_step = false;
        }

        self.select_vel_pos_fusion();
        self.select_mag_fusion();
        self.select_tas_fusion();
        self.select_beta_fusion();
    }

    // ─── Measurement ingest ──────────────────────────────────────────────────

    fn read_imu_data(&mut self, imu: &ImuSample) {
        // the IMU sample time is the common time reference for the filter
        self.imu_sample_time_ms = imu.timestamp_ms;
        self.dt_imu = imu.dt.clamp(0.001, 1.0);

        let ang_rate = imu.gyro_vec();
        let accel1 = imu.accel1_vec();
        let accel2 = imu.accel2_vec();

        // trapezoidal integration into delta angle and delta velocities
        self.d_ang_imu = (ang_rate + self.last_ang_rate) * (self.dt_imu * 0.5);
        self.last_ang_rate = ang_rate;
        self.d_vel_imu1 = (accel1 + self.last_accel1) * (self.dt_imu * 0.5);
        self.last_accel1 = accel1;
        self.d_vel_imu2 = (accel2 + self.last_accel2) * (self.dt_imu * 0.5);
        self.last_accel2 = accel2;
    }

    fn read_gps_data(&mut self) {
        let Some(fix) = self.latest_gps else {
            return;
        };
        self.gps_fix_ok = fix.fix_3d;
        if fix.timestamp_ms != self.last_fix_time_ms && fix.fix_3d {
            self.second_last_fix_time_ms = self.last_fix_time_ms;
            self.last_fix_time_ms = fix.timestamp_ms;
            self.new_data_gps = true;

            // recall the states stored closest to the measurement time
            // after allowing for the configured delays
            let vel_delay = self.config.msec_vel_delay.clamp(0, 500) as u64;
            let pos_delay = self.config.msec_pos_delay.clamp(0, 500) as u64;
            self.states_at_vel_time = self
                .history
                .recall(&self.state, self.imu_sample_time_ms.saturating_sub(vel_delay));
            self.states_at_pos_time = self
                .history
                .recall(&self.state, self.imu_sample_time_ms.saturating_sub(pos_delay));

            self.vel_ned = Vector3::new(fix.vel_ned.0, fix.vel_ned.1, fix.vel_ned.2);

            // de-weight the GPS with a marginal satellite count
            self.gps_noise_scaler = if fix.num_sats >= 6 {
                1.0
            } else if fix.num_sats == 5 {
                1.4
            } else {
                2.0
            };

            // without a vertical velocity output, drop back to 2-D velocity
            if !fix.have_vertical_velocity && self.fusion_mode_gps == GPS_MODE_VEL3D {
                self.fusion_mode_gps = GPS_MODE_VEL2D;
            }

            let (north, east) = latlon_to_ne(
                fix.latitude,
                fix.longitude,
                self.home.latitude,
                self.home.longitude,
            );
            self.gps_pos_ne = Vector2::new(north, east);
            self.decay_gps_offset();
        }
    }

    fn read_hgt_data(&mut self) {
        let Some(sample) = self.latest_baro else {
            self.new_data_hgt = false;
            return;
        };
        if sample.timestamp_ms != self.last_hgt_meas_time {
            self.last_hgt_meas_time = sample.timestamp_ms;
            self.last_hgt_time_ms = self.imu_sample_time_ms;
            self.hgt_mea = sample.altitude;
            self.new_data_hgt = true;
            let delay = self.config.msec_hgt_delay.clamp(0, 500) as u64;
            self.states_at_hgt_time = self
                .history
                .recall(&self.state, self.imu_sample_time_ms.saturating_sub(delay));
        } else {
            self.new_data_hgt = false;
        }
    }

    fn read_mag_data(&mut self) {
        let Some(sample) = self.latest_mag else {
            self.new_data_mag = false;
            return;
        };
        if self.use_compass() && sample.timestamp_ms != self.last_mag_update {
            self.last_mag_update = sample.timestamp_ms;
            // the body-fixed magnetic bias carries the opposite sign to the
            // device's hard-iron offsets; readings are scaled down by 1000
            // for numerical conditioning
            self.mag_bias = -sample.offsets_vec() * 0.001;
            self.mag_data = sample.field_vec() * 0.001 + self.mag_bias;
            let delay = self.config.msec_mag_delay.clamp(0, 500) as u64;
            self.states_at_mag_meas_time = self
                .history
                .recall(&self.state, self.imu_sample_time_ms.saturating_sub(delay));
            self.new_data_mag = true;
        } else {
            self.new_data_mag = false;
        }
    }

    fn read_air_spd_data(&mut self) {
        let Some(sample) = self.latest_airspeed else {
            self.new_data_tas = false;
            return;
        };
        if self.airspeed_enabled && sample.timestamp_ms != self.last_airspeed_update {
            self.last_airspeed_update = sample.timestamp_ms;
            self.vtas_meas = sample.airspeed * sample.eas2tas;
            self.eas2tas = sample.eas2tas;
            self.new_data_tas = true;
            let delay = self.config.msec_tas_delay.clamp(0, 500) as u64;
            self.states_at_vtas_meas_time = self
                .history
                .recall(&self.state, self.imu_sample_time_ms.saturating_sub(delay));
        } else {
            self.new_data_tas = false;
        }
    }

    // ─── Strapdown mechanisation ─────────────────────────────────────────────

    fn update_strapdown_equations_ned(&mut self) {
        let gravity_ned = Vector3::new(0.0, 0.0, GRAVITY_MSS);

        // remove sensor bias errors
        self.corrected_del_ang = self.d_ang_imu - self.state.gyro_bias();
        self.corrected_del_vel1 = self.d_vel_imu1;
        self.corrected_del_vel2 = self.d_vel_imu2;
        self.corrected_del_vel1.z -= self.state.accel_zbias1();
        self.corrected_del_vel2.z -= self.state.accel_zbias2();

        // blend the delta velocities using the IMU weighting
        self.corrected_del_vel12 = self.corrected_del_vel1 * self.imu1_weighting
            + self.corrected_del_vel2 * (1.0 - self.imu1_weighting);

        let prev_del_ang = self.prev_del_ang;
        self.prev_del_ang = self.corrected_del_ang;

        // earth rotation compensation plus the second-order coning term
        self.corrected_del_ang = self.corrected_del_ang
            - self.prev_tnb * self.earth_rate_ned * self.dt_imu
            + prev_del_ang.cross(&self.corrected_del_ang) * 8.333333e-2;

        // rotate the attitude through the delta angle and renormalise
        let delta_quat = Quat::from_rotation_vector(self.corrected_del_ang);
        let mut q_updated = quat_rotate(&self.state.quat(), &delta_quat);
        q_updated.normalize();
        self.state.set_quat(q_updated);

        let tbn = q_updated.rotation_matrix();
        self.prev_tnb = tbn.transpose();

        // transform the body delta velocities into the nav frame
        let del_vel_nav = tbn * self.corrected_del_vel12 + gravity_ned * self.dt_imu;
        let del_vel_nav1 = tbn * self.corrected_del_vel1 + gravity_ned * self.dt_imu;
        let del_vel_nav2 = tbn * self.corrected_del_vel2 + gravity_ned * self.dt_imu;

        // rate of change of velocity feeds the measurement variance scaling
        // and the in-air detection
        self.vel_dot_ned = del_vel_nav / self.dt_imu;
        self.vel_dot_ned_filt = self.vel_dot_ned * 0.05 + self.vel_dot_ned_filt * 0.95;
        self.acc_nav_mag = self.vel_dot_ned_filt.norm();
        self.acc_nav_mag_horiz =
            (sq(self.vel_dot_ned_filt.x) + sq(self.vel_dot_ned_filt.y)).sqrt();

        let last_velocity = self.state.velocity();
        let last_vel1 = self.state.vel1();
        let last_vel2 = self.state.vel2();

        self.state.set_velocity(last_velocity + del_vel_nav);
        self.state.set_vel1(last_vel1 + del_vel_nav1);
        self.state.set_vel2(last_vel2 + del_vel_nav2);

        // trapezoidal position integration, blended and per-IMU
        let position = self.state.position()
            + (self.state.velocity() + last_velocity) * (self.dt_imu * 0.5);
        self.state.set_position(position);
        let pos_d1 =
            self.state.pos_d1() + (self.state.vel1().z + last_vel1.z) * (self.dt_imu * 0.5);
        self.state.set_pos_d1(pos_d1);
        let pos_d2 =
            self.state.pos_d2() + (self.state.vel2().z + last_vel2.z) * (self.dt_imu * 0.5);
        self.state.set_pos_d2(pos_d2);

        self.constrain_states();
    }

    // ─── Fusion scheduling ───────────────────────────────────────────────────

    fn select_vel_pos_fusion(&mut self) {
        if !self.static_mode {
            self.read_gps_data();
            if self.new_data_gps {
                self.new_data_gps = false;
                self.gps_incr_state_delta = [0.0; 10];
                self.gps_update_count = 0;
                self.fuse_vel_data = true;
                self.fuse_pos_data = true;
                // after a long GPS outage the solution has drifted too far
                // for gating; rebase it before fusing
                let gps_retry_timeout = if self.use_airspeed() {
                    GPS_RETRY_TIME_USE_TAS
                } else {
                    GPS_RETRY_TIME_NO_TAS
                };
                if self
                    .imu_sample_time_ms
                    .saturating_sub(self.second_last_fix_time_ms)
                    > gps_retry_timeout
                {
                    warn!("GPS data regained after timeout, resetting position and velocity");
                    self.reset_position();
                    self.reset_velocity();
                    self.history.reset(&self.state, self.imu_sample_time_ms);
                }
            } else {
                self.fuse_vel_data = false;
                self.fuse_pos_data = false;
            }
        } else {
            // static mode fuses synthetic zero-position measurements; skip
            // them while accelerating hard to limit attitude errors at launch
            self.fuse_pos_data = self.acc_nav_mag < 4.9;
            self.fuse_vel_data = false;
        }

        self.read_hgt_data();
        if self.new_data_hgt {
            self.new_data_hgt = false;
            self.hgt_incr_state_delta = [0.0; 10];
            self.hgt_update_count = 0;
            self.fuse_hgt_data = true;
        } else {
            self.fuse_hgt_data = false;
        }

        if self.fuse_vel_data || self.fuse_pos_data || self.fuse_hgt_data {
            self.fuse_vel_pos_ned();
        }

        // trickle the spread corrections into the attitude, velocity and
        // position states
        if self.gps_update_count < self.gps_update_count_max {
            self.gps_update_count += 1;
            for i in 0..=9 {
                self.state[i] += self.gps_incr_state_delta[i];
            }
        }
        if self.hgt_update_count < self.hgt_update_count_max {
            self.hgt_update_count += 1;
            for i in 0..=9 {
                self.state[i] += self.hgt_incr_state_delta[i];
            }
        }
    }

    fn select_mag_fusion(&mut self) {
        if self.mag_failed {
            return;
        }
        self.read_mag_data();

        // A compass that stays outside its consistency gate, or goes
        // silent, for too long is timed out; vehicles relying on the
        // sideslip assumption then fail it permanently until the filter is
        // reset. The healthy time only refreshes when a sample actually
        // arrived, so a dead sensor ages out like an inconsistent one.
        if self.mag_health && self.new_data_mag {
            self.last_healthy_mag_time_ms = self.imu_sample_time_ms;
        } else if self
            .imu_sample_time_ms
            .saturating_sub(self.last_healthy_mag_time_ms)
            > MAG_FAIL_TIME_LIMIT_MS
            && self.use_compass()
        {
            if !self.mag_timeout {
                warn!("magnetometer timed out");
            }
            self.mag_timeout = true;
            if self.assume_zero_sideslip() {
                warn!("magnetometer failed permanently for fly-forward vehicle");
                self.mag_failed = true;
            }
        } else {
            self.mag_timeout = false;
        }

        let data_ready = self.states_initialised && self.use_compass() && self.new_data_mag;
        if data_ready {
            self.fuse_mag_data = true;
            self.mag_incr_state_delta = [0.0; 10];
            self.mag_update_count = 0;
        } else {
            self.fuse_mag_data = false;
        }

        self.fuse_magnetometer();
        self.fuse_mag_data = false;

        if self.mag_update_count < self.mag_update_count_max {
            self.mag_update_count += 1;
            for i in 0..=9 {
                self.state[i] += self.mag_incr_state_delta[i];
            }
        }
    }

    fn select_tas_fusion(&mut self) {
        self.read_air_spd_data();

        self.tas_data_waiting = self.states_initialised
            && !self.inhibit_wind_states
            && (self.tas_data_waiting || self.new_data_tas);

        // airspeed normally skips magnetometer frames to spread the load,
        // unless it has waited too long or the immediate-fusion override is on
        let timeout =
            self.imu_sample_time_ms.saturating_sub(self.tas_msec_prev) >= TAS_MSEC_MAX;
        if self.tas_data_waiting
            && (!self.mag_fuse_performed || timeout || self.config.fuse_me_now)
        {
            self.fuse_airspeed();
            self.tas_msec_prev = self.imu_sample_time_ms;
            self.tas_data_waiting = false;
        }
    }

    fn select_beta_fusion(&mut self) {
        // Synthetic sideslip only helps fly-forward vehicles with a stable
        // wind estimate, and is redundant when the full sensor complement is
        // healthy. It shares the load-spreading rule with airspeed fusion.
        if self.assume_zero_sideslip()
            && !(self.use_compass() && self.use_airspeed() && self.pos_health)
            && !self.inhibit_wind_states
            && self.imu_sample_time_ms.saturating_sub(self.beta_msec_prev) >= MSEC_BETA_AVG
            && (!self.mag_fuse_performed || self.config.fuse_me_now)
        {
            self.fuse_sideslip();
            self.beta_msec_prev = self.imu_sample_time_ms;
        }
    }

    // ─── Supervisor ──────────────────────────────────────────────────────────

    /// On-ground / in-air detection plus the wind and magnetic field state
    /// inhibits derived from it.
    fn set_flight_and_fusion_modes(&mut self) {
        let high_air_spd = self.use_airspeed() && self.vtas_meas > 8.0;
        let gnd_spd_sq = sq(self.vel_ned.x) + sq(self.vel_ned.y);
        let in_air_sum = high_air_spd as u8
            + (gnd_spd_sq > 9.0) as u8
            + (gnd_spd_sq > 36.0) as u8
            + (gnd_spd_sq > 81.0) as u8
            + (self.hgt_mea.abs() > 15.0) as u8;

        if self.config.mag_cal == MagCalMode::Manoeuvre
            && self.acc_nav_mag_horiz > 0.5
            && !self.static_mode_demanded()
            && self.use_compass()
        {
            self.on_ground = false;
        } else {
            // hysteresis: leaving the ground needs 3 of 5 criteria, staying
            // in the air only 2
            self.on_ground = !((self.on_ground && in_air_sum >= 3)
                || (!self.on_ground && in_air_sum >= 2));

            // launching without a usable compass aligns yaw to the GPS course
            if !self.on_ground
                && self.prev_on_ground
                && (!self.use_compass() || (self.mag_timeout && self.assume_zero_sideslip()))
            {
                self.align_yaw_gps();
            }

            // launching a fly-forward vehicle without airspeed seeds the wind
            // states so early wind gains stay bounded
            if !self.on_ground
                && self.prev_on_ground
                && !self.use_airspeed()
                && self.assume_zero_sideslip()
            {
                self.set_wind_vel_states();
            }
        }
        self.prev_on_ground = self.on_ground;

        self.inhibit_wind_states = (!self.use_airspeed() && !self.assume_zero_sideslip())
            || self.on_ground
            || self.static_mode;
        self.inhibit_mag_states = self.config.mag_cal == MagCalMode::Never
            || !self.use_compass()
            || self.on_ground
            || self.static_mode;
    }

    /// Divergence shows up as a rapid change in the gyro bias estimate.
    fn check_divergence(&mut self) {
        let delta = self.state.gyro_bias() - self.last_gyro_bias;
        let delta_len = delta.norm();
        if delta_len != 0.0 {
            let bias_var =
                (self.p[10][10] + self.p[11][11] + self.p[12][12]).clamp(1e-12, 1e-8);
            self.scaled_delta_gyr_bias_lgth = (5e-8 / bias_var) * delta_len / self.dt_imu;
        }
        let divergence_detected = self.scaled_delta_gyr_bias_lgth > 1.0;
        self.last_gyro_bias = self.state.gyro_bias();
        // hold off after a reset so the bias estimate can settle
        if self
            .imu_sample_time_ms
            .saturating_sub(self.last_diverge_time_ms)
            > 10_000
        {
            if divergence_detected {
                self.filter_diverged = true;
                self.fault_status.diverged = true;
                self.last_diverge_time_ms = self.imu_sample_time_ms;
            } else {
                self.filter_diverged = false;
            }
        }
    }

    /// Force-align yaw with the GPS ground course. Used at launch or after
    /// compass failure on fly-forward vehicles.
    fn align_yaw_gps(&mut self) {
        if sq(self.vel_ned.x) + sq(self.vel_ned.y) > 16.0 {
            let (roll, pitch, old_yaw) = self.state.quat().to_euler();
            let new_yaw = self.vel_ned.y.atan2(self.vel_ned.x);
            let yaw_err = (new_yaw - old_yaw).abs();
            // only correct when off by more than 45 degrees (and not merely
            // wrapped), or when yaw has never been aligned
            if (yaw_err > 0.7854 && yaw_err < 5.4978) || !self.yaw_aligned {
                debug!("aligning yaw to GPS course, {:.1} deg", new_yaw.to_degrees());
                self.state.set_quat(Quat::from_euler(roll, pitch, new_yaw));
                self.yaw_aligned = true;
                if self.fusion_mode_gps < GPS_MODE_POS_ONLY {
                    let mut vel = self.state.velocity();
                    vel.x = self.vel_ned.x;
                    vel.y = self.vel_ned.y;
                    self.state.set_velocity(vel);
                }
                // the attitude, velocity and position uncertainties are
                // unknown after the step change; reset them to nominal
                covariance::zero_rows(&mut self.p, 0, 9);
                covariance::zero_cols(&mut self.p, 0, 9);
                self.p[0][0] = 1.0e-9;
                self.p[1][1] = 0.25 * sq(1.0_f64.to_radians());
                self.p[2][2] = self.p[1][1];
                self.p[3][3] = self.p[1][1];
                self.p[4][4] = 400.0;
                self.p[5][5] = self.p[4][4];
                self.p[6][6] = sq(0.7);
                self.p[7][7] = 400.0;
                self.p[8][8] = self.p[7][7];
                self.p[9][9] = sq(5.0);
            }
        }
    }

    /// Seed the wind states to the reciprocal of the ground velocity scaled
    /// to the startup wind speed. Launching into wind without an airspeed
    /// sensor would otherwise leave wind gains unbounded until the first turn.
    fn set_wind_vel_states(&mut self) {
        let vel = self.state.velocity();
        let gnd_spd = (sq(vel.x) + sq(vel.y)).sqrt();
        if gnd_spd > 4.0 {
            let scale_factor = STARTUP_WIND_SPEED / gnd_spd;
            self.state
                .set_wind_vel(Vector2::new(-vel.x * scale_factor, -vel.y * scale_factor));
            covariance::zero_rows(&mut self.p, 14, 15);
            covariance::zero_cols(&mut self.p, 14, 15);
            self.p[14][14] = 64.0;
            self.p[15][15] = self.p[14][14];
        }
    }

    /// Decay the GPS glitch offset toward zero at 1 m/s and cap its radius
    /// at 100 m.
    fn decay_gps_offset(&mut self) {
        let lapsed_time =
            0.001 * self.imu_sample_time_ms.saturating_sub(self.last_decay_time_ms) as f64;
        self.last_decay_time_ms = self.imu_sample_time_ms;
        let offset_radius =
            (sq(self.gps_pos_glitch_offset_ne.x) + sq(self.gps_pos_glitch_offset_ne.y)).sqrt();
        if offset_radius > lapsed_time + 0.1 {
            let scale_factor = (offset_radius - lapsed_time).clamp(0.0, 100.0) / offset_radius;
            self.gps_pos_glitch_offset_ne *= scale_factor;
        }
    }

    /// Initial attitude and earth field states from roll/pitch and the
    /// magnetometer. Without a usable compass the yaw is left at zero and
    /// flagged unaligned.
    fn calc_quat_and_field_states(&mut self, roll: f64, pitch: f64) -> Quat {
        if self.use_compass() {
            self.read_mag_data();
            // heading of the measured field relative to the body
            let tbn = Quat::from_euler(roll, pitch, 0.0).rotation_matrix();
            let init_mag_ned = tbn * (self.mag_data - self.mag_bias);
            let mag_heading = init_mag_ned.y.atan2(init_mag_ned.x);
            let yaw = self.mag_declination - mag_heading;
            self.yaw_aligned = true;
            let init_quat = Quat::from_euler(roll, pitch, yaw);
            // rotate the measurement into NED to seed the earth field states
            let tbn = init_quat.rotation_matrix();
            self.state
                .set_earth_magfield(tbn * (self.mag_data - self.mag_bias));
            init_quat
        } else {
            self.yaw_aligned = false;
            Quat::from_euler(roll, pitch, 0.0)
        }
    }

    // ─── Resets ──────────────────────────────────────────────────────────────

    /// Reset horizontal position to the last GPS measurement (or zero in
    /// static mode) and rewrite the stored history to match.
    pub(crate) fn reset_position(&mut self) {
        if self.static_mode {
            self.state[7] = 0.0;
            self.state[8] = 0.0;
        } else if self.gps_fix_ok {
            self.read_gps_data();
            // compensate for the GPS latency using the GPS velocity
            let pos_delay_s = 0.001 * self.config.msec_pos_delay.clamp(0, 500) as f64;
            self.state[7] = self.gps_pos_ne.x
                + self.gps_pos_glitch_offset_ne.x
                + self.vel_ned.x * pos_delay_s;
            self.state[8] = self.gps_pos_ne.y
                + self.gps_pos_glitch_offset_ne.y
                + self.vel_ned.y * pos_delay_s;
        }
        self.history.overwrite_positions_ne(self.state[7], self.state[8]);
    }

    /// Reset all velocity states to the last GPS measurement (or zero in
    /// static mode) and rewrite the stored history to match.
    pub(crate) fn reset_velocity(&mut self) {
        if self.static_mode {
            self.state.set_velocity(Vector3::zeros());
            self.state.set_vel1(Vector3::zeros());
            self.state.set_vel2(Vector3::zeros());
        } else if self.gps_fix_ok {
            self.read_gps_data();
            let mut vel = self.vel_ned;
            // without a vertical velocity measurement, assume zero
            if self.fusion_mode_gps >= GPS_MODE_VEL2D {
                vel.z = 0.0;
            }
            self.state.set_velocity(vel);
            self.state.set_vel1(vel);
            self.state.set_vel2(vel);
            self.history.overwrite_velocities(vel);
        }
    }

    /// Reset the vertical position states to the last height measurement
    /// and rewrite the stored history to match.
    pub(crate) fn reset_height(&mut self) {
        self.read_hgt_data();
        self.state[9] = -self.hgt_mea;
        self.state.set_pos_d1(-self.hgt_mea);
        self.state.set_pos_d2(-self.hgt_mea);
        self.history.overwrite_heights(-self.hgt_mea);
    }

    /// Zero the gyro bias states and reopen their covariance.
    pub fn reset_gyro_bias(&mut self) {
        self.state.set_gyro_bias(Vector3::zeros());
        covariance::zero_rows(&mut self.p, 10, 12);
        covariance::zero_cols(&mut self.p, 10, 12);
        self.p[10][10] = sq((INIT_GYRO_BIAS_UNCERTAINTY * self.dt_imu).to_radians());
        self.p[11][11] = self.p[10][10];
        self.p[12][12] = self.p[10][10];
    }

    // ─── Mode predicates ─────────────────────────────────────────────────────

    fn static_mode_demanded(&self) -> bool {
        !self.armed || !self.correct_centrifugal
    }

    fn use_compass(&self) -> bool {
        self.compass_enabled && !self.mag_failed
    }

    fn use_airspeed(&self) -> bool {
        self.airspeed_enabled
    }

    fn assume_zero_sideslip(&self) -> bool {
        // ground vehicles are excluded: a traction-loss spin would violate
        // the assumption violently
        self.config.vehicle.fly_forward()
    }
}

// ─── Output and query surface ────────────────────────────────────────────────

impl NavEkf {
    /// Consolidated health status. False while uninitialised, diverged (or
    /// within 10 s of a divergence), carrying NaNs, or timed out on any of
    /// the velocity/position/height streams.
    pub fn healthy(&self) -> bool {
        if !self.states_initialised {
            return false;
        }
        if self.state.quat().is_nan() {
            return false;
        }
        let vel = self.state.velocity();
        if vel.x.is_nan() || vel.y.is_nan() || vel.z.is_nan() {
            return false;
        }
        if self.filter_diverged
            || self
                .imu_sample_time_ms
                .saturating_sub(self.last_diverge_time_ms)
                < 10_000
        {
            return false;
        }
        // a forced fusion after a timeout leaves the solution suspect; this
        // only shows as a transient
        if self.pos_timeout || self.vel_timeout || self.hgt_timeout {
            return false;
        }
        true
    }

    /// True while height measurements are failing their consistency check.
    pub fn height_drifting(&self) -> bool {
        !self.hgt_health
    }

    /// True while position measurements are failing their consistency check.
    pub fn position_drifting(&self) -> bool {
        !self.pos_health
    }

    pub fn quaternion(&self) -> Quat {
        self.state.quat()
    }

    /// Euler attitude with the AHRS trim offsets removed (rad).
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        let (roll, pitch, yaw) = self.state.quat().to_euler();
        (roll - self.trim.x, pitch - self.trim.y, yaw - self.trim.z)
    }

    /// Body-to-NED rotation with the trim rotation removed.
    pub fn rotation_body_to_ned(&self) -> Matrix3<f64> {
        let trim_rot = Quat::from_euler(self.trim.x, self.trim.y, 0.0).rotation_matrix();
        self.state.quat().rotation_matrix() * trim_rot.transpose()
    }

    /// NED velocity (m/s).
    pub fn vel_ned(&self) -> Vector3<f64> {
        self.state.velocity()
    }

    /// NED position relative to home (m).
    pub fn pos_ned(&self) -> Vector3<f64> {
        self.state.position()
    }

    /// Geodetic position derived from the home offset.
    pub fn llh(&self) -> GeoPosition {
        let pos = self.state.position();
        let (latitude, longitude) =
            crate::maths::ne_to_latlon(pos.x, pos.y, self.home.latitude, self.home.longitude);
        GeoPosition {
            latitude,
            longitude,
            altitude: self.home.altitude - pos.z,
        }
    }

    /// Gyro bias estimate (rad/s).
    pub fn gyro_bias(&self) -> Vector3<f64> {
        if self.dt_imu == 0.0 {
            return Vector3::zeros();
        }
        self.state.gyro_bias() / self.dt_imu
    }

    /// Z accel bias per IMU (m/s^2).
    pub fn accel_zbias(&self) -> (f64, f64) {
        if self.dt_imu == 0.0 {
            return (0.0, 0.0);
        }
        (
            self.state.accel_zbias1() / self.dt_imu,
            self.state.accel_zbias2() / self.dt_imu,
        )
    }

    /// Weighting of IMU1 in the delta velocity blend (0..1).
    pub fn imu1_weighting(&self) -> f64 {
        self.imu1_weighting
    }

    /// NED wind estimate; the down component is not estimated.
    pub fn wind(&self) -> Vector3<f64> {
        let w = self.state.wind_vel();
        Vector3::new(w.x, w.y, 0.0)
    }

    /// Earth magnetic field estimate scaled back to sensor units.
    pub fn mag_ned(&self) -> Vector3<f64> {
        self.state.earth_magfield() * 1000.0
    }

    /// Body magnetic field estimate scaled back to sensor units.
    pub fn mag_xyz(&self) -> Vector3<f64> {
        self.state.body_magfield() * 1000.0
    }

    /// Innovations for the velocity, position, magnetometer (sensor units)
    /// and airspeed observations.
    pub fn innovations(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>, f64) {
        (
            Vector3::new(
                self.innov_vel_pos[0],
                self.innov_vel_pos[1],
                self.innov_vel_pos[2],
            ),
            Vector3::new(
                self.innov_vel_pos[3],
                self.innov_vel_pos[4],
                self.innov_vel_pos[5],
            ),
            Vector3::new(self.innov_mag[0], self.innov_mag[1], self.innov_mag[2]) * 1.0e3,
            self.innov_vtas,
        )
    }

    /// Square roots of the innovation consistency test ratios together with
    /// the GPS glitch offset; indicates the tuning margin available.
    #[allow(clippy::type_complexity)]
    pub fn variances(&self) -> (f64, f64, f64, Vector3<f64>, f64, Vector2<f64>) {
        (
            self.vel_test_ratio.sqrt(),
            self.pos_test_ratio.sqrt(),
            self.hgt_test_ratio.sqrt(),
            Vector3::new(
                self.mag_test_ratio[0].sqrt(),
                self.mag_test_ratio[1].sqrt(),
                self.mag_test_ratio[2].sqrt(),
            ),
            self.tas_test_ratio.sqrt(),
            self.gps_pos_glitch_offset_ne,
        )
    }

    /// Fault bitmap and the normalised gyro-bias-delta length used by the
    /// divergence test.
    pub fn filter_faults(&self) -> (u8, f64) {
        (self.fault_status.bitmap(), self.scaled_delta_gyr_bias_lgth)
    }

    pub fn fault_status(&self) -> FaultStatus {
        self.fault_status
    }

    pub fn mag_timeout(&self) -> bool {
        self.mag_timeout
    }

    pub fn mag_failed(&self) -> bool {
        self.mag_failed
    }

    /// Whether magnetometer fusion ran this cycle and whether another axis
    /// is still pending.
    pub fn mag_fuse_status(&self) -> (bool, bool) {
        (self.mag_fuse_performed, self.mag_fuse_required)
    }

    /// Whether the last update performed a covariance prediction step.
    pub fn covariance_prediction_step(&self) -> bool {
        self.cov_pred_step
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn static_mode(&self) -> bool {
        self.static_mode
    }

    pub fn state_vector(&self) -> &StateVector {
        &self.state
    }

    /// Full covariance matrix, exposed for analysis and testing.
    pub fn covariance(&self) -> &Matrix22 {
        &self.p
    }

    pub fn snapshot(&self) -> crate::outputs::NavSnapshot {
        let (roll, pitch, yaw) = self.euler_angles();
        let q = self.state.quat().0;
        let vel = self.state.velocity();
        let pos = self.state.position();
        let llh = self.llh();
        let gyro_bias = self.gyro_bias();
        let wind = self.state.wind_vel();
        let mag_ned = self.mag_ned();
        let mag_xyz = self.mag_xyz();
        crate::outputs::NavSnapshot {
            timestamp_ms: self.imu_sample_time_ms,
            healthy: self.healthy(),
            euler: (roll, pitch, yaw),
            quaternion: (q[0], q[1], q[2], q[3]),
            velocity_ned: (vel.x, vel.y, vel.z),
            position_ned: (pos.x, pos.y, pos.z),
            latitude: llh.latitude,
            longitude: llh.longitude,
            altitude: llh.altitude,
            gyro_bias: (gyro_bias.x, gyro_bias.y, gyro_bias.z),
            accel_zbias: self.accel_zbias(),
            imu1_weighting: self.imu1_weighting,
            wind: (wind.x, wind.y),
            mag_ned: (mag_ned.x, mag_ned.y, mag_ned.z),
            mag_xyz: (mag_xyz.x, mag_xyz.y, mag_xyz.z),
            vel_test_ratio: self.vel_test_ratio.sqrt(),
            pos_test_ratio: self.pos_test_ratio.sqrt(),
            hgt_test_ratio: self.hgt_test_ratio.sqrt(),
            mag_test_ratio: (
                self.mag_test_ratio[0].sqrt(),
                self.mag_test_ratio[1].sqrt(),
                self.mag_test_ratio[2].sqrt(),
            ),
            tas_test_ratio: self.tas_test_ratio.sqrt(),
            gps_glitch_offset: (
                self.gps_pos_glitch_offset_ne.x,
                self.gps_pos_glitch_offset_ne.y,
            ),
            fault_bitmap: self.fault_status.bitmap(),
            on_ground: self.on_ground,
            static_mode: self.static_mode,
        }
    }
}

/// Earth spin resolved into the NED frame at the given latitude (degrees).
fn calc_earth_rate_ned(latitude_deg: f64) -> Vector3<f64> {
    let lat_rad = latitude_deg.to_radians();
    Vector3::new(EARTH_RATE * lat_rad.cos(), 0.0, -EARTH_RATE * lat_rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EkfConfig;
    use approx::assert_abs_diff_eq;

    fn level_imu(t_ms: u64, dt: f64) -> ImuSample {
        ImuSample {
            timestamp_ms: t_ms,
            dt,
            accel1: (0.0, 0.0, -GRAVITY_MSS),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn update_before_initialisation_is_a_noop() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.update(&level_imu(10, 0.0025));
        assert!(!ekf.states_initialised());
        assert_eq!(ekf.state.position(), Vector3::zeros());
    }

    #[test]
    fn bootstrap_produces_level_attitude() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        assert!(ekf.states_initialised());
        let (roll, pitch, yaw) = ekf.state.quat().to_euler();
        assert_abs_diff_eq!(roll, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pitch, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(yaw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn bootstrap_recovers_tilt_from_accelerometer() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        // 0.1 rad pitch-up tilts the specific force onto body X
        let pitch = 0.1_f64;
        let imu = ImuSample {
            timestamp_ms: 0,
            dt: 0.0025,
            accel1: (pitch.sin() * GRAVITY_MSS, 0.0, -pitch.cos() * GRAVITY_MSS),
            accel2: None,
            gyro: (0.0, 0.0, 0.0),
        };
        ekf.initialise_filter_bootstrap(&imu);
        let (_, est_pitch, _) = ekf.state.quat().to_euler();
        assert_abs_diff_eq!(est_pitch, pitch, epsilon = 1e-6);
    }

    #[test]
    fn quaternion_stays_unit_norm_through_updates() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_vehicle_status(true, true);
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        let mut t = 0u64;
        for k in 1..2000u64 {
            t = k * 3;
            let mut imu = level_imu(t, 0.0025);
            imu.gyro = (0.3, -0.2, 0.5);
            ekf.update(&imu);
            assert!((ekf.state.quat().length() - 1.0).abs() < 1e-6);
        }
        assert!(ekf.imu_sample_time_ms == t);
    }

    #[test]
    fn covariance_stays_symmetric_and_bounded() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_vehicle_status(true, true);
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        for k in 1..1000u64 {
            let mut imu = level_imu(k * 3, 0.0025);
            imu.gyro = (0.02, 0.01, -0.015);
            ekf.update(&imu);
        }
        for i in 0..22 {
            for j in 0..22 {
                assert!((ekf.p[i][j] - ekf.p[j][i]).abs() < 1e-9, "P not symmetric");
            }
            assert!(ekf.p[i][i] >= 0.0, "negative variance at {}", i);
        }
        // spot check the per-group caps
        for i in 0..4 {
            assert!(ekf.p[i][i] <= 1.0);
        }
        for i in 4..7 {
            assert!(ekf.p[i][i] <= 1.0e3);
        }
        for i in 7..10 {
            assert!(ekf.p[i][i] <= 1.0e6);
        }
    }

    #[test]
    fn imu_stall_resets_and_survives() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_vehicle_status(true, true);
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        for k in 1..100u64 {
            ekf.update(&level_imu(k * 3, 0.0025));
        }
        // half second gap
        let stalled = level_imu(800, 0.5);
        ekf.update(&stalled);
        assert!(ekf.states_initialised());
        // next normal sample resumes filtering
        ekf.update(&level_imu(803, 0.0025));
        assert!(ekf.state.velocity().norm() < 1.0);
    }

    #[test]
    fn zero_dt_update_is_a_noop_on_state() {
        let mut ekf = NavEkf::new(EkfConfig::default());
        ekf.set_vehicle_status(true, true);
        ekf.initialise_filter_bootstrap(&level_imu(0, 0.0025));
        for k in 1..50u64 {
            ekf.update(&level_imu(k * 3, 0.0025));
        }
        let before_state = *ekf.state.as_array();
        let before_p = ekf.p;
        let mut imu = level_imu(150, 0.0);
        imu.gyro = (1.0, 1.0, 1.0);
        ekf.update(&imu);
        assert_eq!(*ekf.state.as_array(), before_state);
        assert_eq!(ekf.p, before_p);
    }

    #[test]
    fn earth_rate_matches_latitude() {
        let omega = calc_earth_rate_ned(45.0);
        assert_abs_diff_eq!(omega.x, EARTH_RATE * 45.0_f64.to_radians().cos(), epsilon = 1e-12);
        assert!(omega.z < 0.0);
        assert_eq!(omega.y, 0.0);
    }
}
