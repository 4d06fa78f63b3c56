// HealthNode - Temperature Task
//
// Reads the analog temperature sensor once per period, converts the 12-bit
// code to degrees and pushes the reading onto the sensor queue.  The delay
// starts after the enqueue, so the period drifts by the conversion time.

use std::thread;

use crate::config::*;
use crate::events::{Reading, Source};
use crate::hal::{TemperatureAdc, TickSource};
use crate::queue::QueueSender;

/// `(raw * 3.3 / 4095) * 100` in single precision.  Codes above the 12-bit
/// range are clamped.
pub fn raw_to_celsius(raw: u16) -> f32 {
    let raw = raw.min(ADC_MAX_CODE);
    (f32::from(raw) * ADC_REFERENCE_VOLTS / f32::from(ADC_MAX_CODE)) * TEMP_SCALE_PER_VOLT
}

pub struct TemperatureSampler<A, C> {
    adc: A,
    clock: C,
}

impl<A: TemperatureAdc, C: TickSource> TemperatureSampler<A, C> {
    pub fn new(adc: A, clock: C) -> Self {
        Self { adc, clock }
    }

    /// One conversion.  A failed read becomes a `Missing` reading.
    pub fn sample(&mut self) -> Reading {
        let raw = self.adc.read_raw();
        let tick = self.clock.now();
        match raw {
            Ok(raw) => Reading::Temperature { celsius: raw_to_celsius(raw), tick },
            Err(fault) => Reading::Missing { source: Source::Temperature, fault },
        }
    }
}

pub fn temperature_task<A: TemperatureAdc, C: TickSource>(
    mut sampler: TemperatureSampler<A, C>,
    sensor_tx: QueueSender<Reading>,
    timing: Timing,
) {
    log::info!("Temperature task started");

    loop {
        let reading = sampler.sample();
        match reading {
            Reading::Missing { fault, .. } => log::warn!("Temperature read failed: {}", fault),
            _ => log::debug!("Temperature reading: {:?}", reading),
        }

        if !super::publish(&sensor_tx, reading, timing.sensor_send, "temperature") {
            return;
        }

        thread::sleep(timing.temperature_period);
    }
}
