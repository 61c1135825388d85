// State history ring buffer.
//
// Each delayed measurement is fused against the state that existed at the
// measurement's capture time. Snapshots are written at most every 10 ms into
// a fixed 50-slot ring, which at the 10 ms floor covers half a second of
// history, comfortably more than the longest configurable sensor delay.
// Lookup is a bounded linear scan over the 50 slots.

use nalgebra::Vector3;

use super::state::StateVector;

pub const HISTORY_SLOTS: usize = 50;

/// Minimum spacing between stored snapshots (ms).
const STORE_SPACING_MS: u64 = 10;

/// A recalled snapshot is only used when it is within this window of the
/// requested time; otherwise the live state is returned.
const MAX_RECALL_AGE_MS: u64 = 200;

#[derive(Clone)]
pub struct StateHistory {
    states: [StateVector; HISTORY_SLOTS],
    timestamps_ms: [u64; HISTORY_SLOTS],
    store_index: usize,
    last_store_time_ms: u64,
}

impl Default for StateHistory {
    fn default() -> Self {
        StateHistory {
            states: [StateVector::default(); HISTORY_SLOTS],
            timestamps_ms: [0; HISTORY_SLOTS],
            store_index: 0,
            last_store_time_ms: 0,
        }
    }
}

impl StateHistory {
    /// Store `state` if at least 10 ms have elapsed since the last store.
    pub fn store(&mut self, state: &StateVector, now_ms: u64) {
        if now_ms.saturating_sub(self.last_store_time_ms) >= STORE_SPACING_MS {
            self.last_store_time_ms = now_ms;
            if self.store_index >= HISTORY_SLOTS {
                self.store_index = 0;
            }
            self.states[self.store_index] = *state;
            self.timestamps_ms[self.store_index] = self.last_store_time_ms;
            self.store_index += 1;
        }
    }

    /// Clear the history and seed slot 0 with the current state.
    pub fn reset(&mut self, state: &StateVector, now_ms: u64) {
        self.states = [StateVector::default(); HISTORY_SLOTS];
        self.timestamps_ms = [0; HISTORY_SLOTS];
        self.store_index = 0;
        self.states[0] = *state;
        self.timestamps_ms[0] = now_ms;
        self.store_index = 1;
    }

    /// Return the stored state closest to `target_ms`, or `live` when no
    /// snapshot is within the 200 ms retrieval window. Snapshots newer than
    /// the target are never returned.
    pub fn recall(&self, live: &StateVector, target_ms: u64) -> StateVector {
        let mut best_delta = MAX_RECALL_AGE_MS;
        let mut best_index = None;
        for i in 0..HISTORY_SLOTS {
            if self.timestamps_ms[i] > target_ms {
                continue;
            }
            let delta = target_ms - self.timestamps_ms[i];
            if delta < best_delta {
                best_delta = delta;
                best_index = Some(i);
            }
        }
        match best_index {
            Some(i) => self.states[i],
            None => *live,
        }
    }

    /// Overwrite the horizontal position in every slot. Used after a
    /// position reset so the next GPS samples are not rejected against
    /// pre-reset history.
    pub fn overwrite_positions_ne(&mut self, north: f64, east: f64) {
        for s in self.states.iter_mut() {
            s[7] = north;
            s[8] = east;
        }
    }

    /// Overwrite every stored velocity (blended and per-IMU) after a
    /// velocity reset.
    pub fn overwrite_velocities(&mut self, vel: Vector3<f64>) {
        for s in self.states.iter_mut() {
            s.set_velocity(vel);
            s.set_vel1(vel);
            s.set_vel2(vel);
        }
    }

    /// Overwrite every stored down position after a height reset.
    pub fn overwrite_heights(&mut self, pos_d: f64) {
        for s in self.states.iter_mut() {
            s[9] = pos_d;
            s.set_pos_d1(pos_d);
            s.set_pos_d2(pos_d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn state_with_north(n: f64) -> StateVector {
        let mut s = StateVector::default();
        s[7] = n;
        s
    }

    #[test]
    fn reset_then_recall_returns_current_state() {
        let mut h = StateHistory::default();
        let s = state_with_north(12.5);
        h.reset(&s, 1000);
        let r = h.recall(&StateVector::default(), 1000);
        assert_eq!(r[7], 12.5);
    }

    #[test]
    fn recall_picks_closest_snapshot() {
        let mut h = StateHistory::default();
        for k in 0..10u64 {
            let s = state_with_north(k as f64);
            h.store(&s, 1000 + k * 20);
        }
        // target lands between snapshots 4 (1080) and 5 (1100)
        let r = h.recall(&StateVector::default(), 1085);
        assert_eq!(r[7], 4.0);
    }

    #[test]
    fn recall_outside_window_returns_live() {
        let mut h = StateHistory::default();
        h.store(&state_with_north(1.0), 1000);
        let live = state_with_north(99.0);
        let r = h.recall(&live, 5000);
        assert_eq!(r[7], 99.0);
    }

    #[test]
    fn store_rate_is_limited() {
        let mut h = StateHistory::default();
        h.store(&state_with_north(1.0), 1000);
        h.store(&state_with_north(2.0), 1005); // dropped, too soon
        let r = h.recall(&StateVector::default(), 1005);
        assert_eq!(r[7], 1.0);
    }

    #[test]
    fn ring_wraps_over_oldest() {
        let mut h = StateHistory::default();
        for k in 0..60u64 {
            h.store(&state_with_north(k as f64), 1000 + k * 10);
        }
        // slot for k=9 has been overwritten by k=59; recall of an old time
        // falls outside the 200 ms window and returns live
        let live = state_with_north(-1.0);
        let r = h.recall(&live, 1090);
        assert_eq!(r[7], -1.0);
    }

    #[test]
    fn overwrite_helpers_touch_all_slots() {
        let mut h = StateHistory::default();
        for k in 0..50u64 {
            h.store(&state_with_north(k as f64), 1000 + k * 10);
        }
        h.overwrite_positions_ne(7.0, 8.0);
        h.overwrite_velocities(Vector3::new(1.0, 2.0, 3.0));
        h.overwrite_heights(-42.0);
        let r = h.recall(&StateVector::default(), 1400);
        assert_eq!(r[7], 7.0);
        assert_eq!(r[8], 8.0);
        assert_eq!(r[9], -42.0);
        assert_eq!(r.vel1(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(r.pos_d2(), -42.0);
    }
}
