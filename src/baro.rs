// Barometer accumulator.
//
// The pressure driver runs from a timer and accumulates ADC conversions;
// the estimator side drains finished (pressure, temperature, count) tuples
// through a bounded channel, so the timer context and the filter loop never
// share mutable state. The driver never blocks: when the channel is full
// the tuple is dropped and the next accumulation carries on.
//
// Altitude and depth sensing are distinct variants. A depth cell converts
// pressure through the water column constant, an altitude cell through the
// temperature-compensated air column model. The two must never be aliased;
// the variant is fixed at construction.

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, warn};

use crate::types::BaroSample;

/// Pascal per metre of water column, no temperature or salinity
/// compensation.
const WATER_COLUMN_PA_PER_M: f64 = 10052.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaroVariant {
    /// Air pressure, height above the calibration datum
    Altitude,
    /// Water pressure, depth below the surface (reported as negative height)
    Depth,
}

/// One accumulation window from the driver: sums of compensated pressure
/// (Pa) and temperature (deg C) plus the number of samples in each sum.
#[derive(Clone, Copy, Debug)]
pub struct AdcAccumulation {
    pub pressure_sum: f64,
    pub temperature_sum: f64,
    pub count: u32,
}

/// Driver side of the channel, owned by the timer context.
pub struct BaroDriverHandle {
    tx: Sender<AdcAccumulation>,
}

impl BaroDriverHandle {
    /// Publish an accumulation without blocking. Returns false when the
    /// consumer is not keeping up and the tuple was dropped.
    pub fn publish(&self, acc: AdcAccumulation) -> bool {
        if acc.count == 0 {
            return false;
        }
        match self.tx.try_send(acc) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("baro accumulation dropped, consumer not draining");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Estimator side: drains accumulations, tracks ground calibration and
/// converts pressure to height for the configured variant. Both the raw
/// (most recent accumulation) and the averaged (whole drain window)
/// readings are kept, because telemetry wants the former and the filter
/// the latter.
pub struct BaroAccumulator {
    rx: Receiver<AdcAccumulation>,
    variant: BaroVariant,
    ground_pressure: f64,
    ground_temperature: f64,
    calibrated: bool,
    raw_pressure: f64,
    raw_temperature: f64,
    avg_pressure: f64,
    avg_temperature: f64,
    last_update_ms: u64,
}

/// Create a connected driver handle / accumulator pair.
pub fn channel(variant: BaroVariant, capacity: usize) -> (BaroDriverHandle, BaroAccumulator) {
    let (tx, rx) = bounded(capacity);
    (
        BaroDriverHandle { tx },
        BaroAccumulator {
            rx,
            variant,
            ground_pressure: 0.0,
            ground_temperature: 0.0,
            calibrated: false,
            raw_pressure: 0.0,
            raw_temperature: 0.0,
            avg_pressure: 0.0,
            avg_temperature: 0.0,
            last_update_ms: 0,
        },
    )
}

impl BaroAccumulator {
    /// Drain pending accumulations and return a height sample when new data
    /// arrived. The first drained window calibrates the ground reference.
    pub fn drain(&mut self, now_ms: u64) -> Option<BaroSample> {
        let mut pressure_sum = 0.0;
        let mut temperature_sum = 0.0;
        let mut count = 0u32;
        let mut last = None;
        while let Ok(acc) = self.rx.try_recv() {
            pressure_sum += acc.pressure_sum;
            temperature_sum += acc.temperature_sum;
            count += acc.count;
            last = Some(acc);
        }
        let last = last?;

        self.raw_pressure = last.pressure_sum / last.count as f64;
        self.raw_temperature = last.temperature_sum / last.count as f64;
        self.avg_pressure = pressure_sum / count as f64;
        self.avg_temperature = temperature_sum / count as f64;
        self.last_update_ms = now_ms;

        if !self.calibrated {
            self.ground_pressure = self.avg_pressure;
            self.ground_temperature = self.avg_temperature;
            self.calibrated = true;
            debug!(
                "baro calibrated: ground pressure {:.1} Pa, temperature {:.1} C",
                self.ground_pressure, self.ground_temperature
            );
        }

        Some(BaroSample {
            timestamp_ms: now_ms,
            altitude: self.height_above_datum(self.avg_pressure),
        })
    }

    fn height_above_datum(&self, pressure: f64) -> f64 {
        match self.variant {
            // standard atmosphere difference using the calibration
            // temperature
            BaroVariant::Altitude => {
                let temp_k = self.ground_temperature + 273.15;
                let scaling = pressure / self.ground_pressure;
                153.8462 * temp_k * (1.0 - scaling.powf(0.190259))
            }
            // submerged: higher pressure means below the datum
            BaroVariant::Depth => (self.ground_pressure - pressure) / WATER_COLUMN_PA_PER_M,
        }
    }

    /// Most recent accumulation window, as (pressure Pa, temperature C).
    pub fn raw(&self) -> (f64, f64) {
        (self.raw_pressure, self.raw_temperature)
    }

    /// Average over the last drain, as (pressure Pa, temperature C).
    pub fn averaged(&self) -> (f64, f64) {
        (self.avg_pressure, self.avg_temperature)
    }

    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn variant(&self) -> BaroVariant {
        self.variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn acc(pressure: f64, temperature: f64, count: u32) -> AdcAccumulation {
        AdcAccumulation {
            pressure_sum: pressure * count as f64,
            temperature_sum: temperature * count as f64,
            count,
        }
    }

    #[test]
    fn first_drain_calibrates_to_zero_height() {
        let (driver, mut baro) = channel(BaroVariant::Altitude, 8);
        assert!(driver.publish(acc(101_325.0, 20.0, 10)));
        let sample = baro.drain(100).unwrap();
        assert!(baro.is_calibrated());
        assert_relative_eq!(sample.altitude, 0.0, epsilon = 1e-9);
        assert_eq!(sample.timestamp_ms, 100);
    }

    #[test]
    fn altitude_rises_as_pressure_falls() {
        let (driver, mut baro) = channel(BaroVariant::Altitude, 8);
        driver.publish(acc(101_325.0, 20.0, 10));
        baro.drain(100).unwrap();
        // ~120 Pa lower is roughly 10 m higher
        driver.publish(acc(101_205.0, 20.0, 10));
        let sample = baro.drain(200).unwrap();
        assert!(sample.altitude > 8.0 && sample.altitude < 12.0, "{}", sample.altitude);
    }

    #[test]
    fn depth_variant_uses_water_column() {
        let (driver, mut baro) = channel(BaroVariant::Depth, 8);
        driver.publish(acc(101_325.0, 15.0, 4));
        baro.drain(50).unwrap();
        // one metre of water above the datum
        driver.publish(acc(101_325.0 + WATER_COLUMN_PA_PER_M, 15.0, 4));
        let sample = baro.drain(150).unwrap();
        assert_relative_eq!(sample.altitude, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn raw_and_averaged_are_tracked_separately() {
        let (driver, mut baro) = channel(BaroVariant::Altitude, 8);
        driver.publish(acc(101_000.0, 20.0, 10));
        driver.publish(acc(101_200.0, 22.0, 10));
        baro.drain(100).unwrap();
        let (raw_p, raw_t) = baro.raw();
        let (avg_p, avg_t) = baro.averaged();
        assert_relative_eq!(raw_p, 101_200.0, epsilon = 1e-9);
        assert_relative_eq!(raw_t, 22.0, epsilon = 1e-9);
        assert_relative_eq!(avg_p, 101_100.0, epsilon = 1e-9);
        assert_relative_eq!(avg_t, 21.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_drain_returns_none_and_keeps_timestamp() {
        let (_driver, mut baro) = channel(BaroVariant::Altitude, 8);
        assert!(baro.drain(100).is_none());
        assert_eq!(baro.last_update_ms(), 0);
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (driver, mut baro) = channel(BaroVariant::Altitude, 2);
        assert!(driver.publish(acc(101_325.0, 20.0, 1)));
        assert!(driver.publish(acc(101_325.0, 20.0, 1)));
        assert!(!driver.publish(acc(101_325.0, 20.0, 1)));
        baro.drain(10).unwrap();
    }

    #[test]
    fn zero_count_accumulation_is_rejected() {
        let (driver, _baro) = channel(BaroVariant::Altitude, 2);
        assert!(!driver.publish(AdcAccumulation {
            pressure_sum: 0.0,
            temperature_sum: 0.0,
            count: 0,
        }));
    }
}
