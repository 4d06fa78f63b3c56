// HealthNode - Heart Rate Task
//
// Polls the pulse pin every sample interval and counts every sample that
// finds it active.  This is level sampling, not edge detection: a pulse held
// across several samples is counted once per sample.  When the window
// (measured in elapsed ticks, not a scheduler trigger) closes, the count is
// scaled to beats per minute and published.

use std::thread;

use crate::config::*;
use crate::events::{Reading, Tick};
use crate::hal::{PulseInput, TickSource};
use crate::queue::QueueSender;

/// Scale a 15-second pulse count to beats per minute.
pub fn pulses_to_bpm(pulse_count: u32) -> u16 {
    u16::try_from(pulse_count.saturating_mul(BPM_PER_WINDOW_COUNT)).unwrap_or(u16::MAX)
}

pub struct HeartRateSampler<P, C> {
    pin: P,
    clock: C,
    window_ticks: Tick,
    pulse_count: u32,
    window_start: Tick,
}

impl<P: PulseInput, C: TickSource> HeartRateSampler<P, C> {
    pub fn new(pin: P, clock: C, window_ticks: Tick) -> Self {
        let window_start = clock.now();
        Self { pin, clock, window_ticks, pulse_count: 0, window_start }
    }

    /// Check the pin once.  Returns a reading when this sample closes the
    /// window.
    pub fn sample(&mut self) -> Option<Reading> {
        if self.pin.is_active() {
            self.pulse_count = self.pulse_count.saturating_add(1);
        }

        if self.clock.now().wrapping_sub(self.window_start) < self.window_ticks {
            return None;
        }

        let bpm = pulses_to_bpm(self.pulse_count);
        log::debug!("Heart rate window closed: {} pulses -> {} BPM", self.pulse_count, bpm);
        self.pulse_count = 0;
        self.window_start = self.clock.now();
        Some(Reading::HeartRate { bpm })
    }

    pub fn pulse_count(&self) -> u32 {
        self.pulse_count
    }
}

pub fn heart_rate_task<P: PulseInput, C: TickSource>(
    mut sampler: HeartRateSampler<P, C>,
    sensor_tx: QueueSender<Reading>,
    timing: Timing,
) {
    log::info!("Heart rate task started");

    loop {
        if let Some(reading) = sampler.sample() {
            if !super::publish(&sensor_tx, reading, timing.sensor_send, "heart rate") {
                return;
            }
        }

        thread::sleep(timing.pulse_sample_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ManualClock, PulsePattern};

    const WINDOW: Tick = 15_000;
    const STEP: Tick = 100;

    /// Run one full window at 100-tick steps and return what it published.
    fn run_window<P: PulseInput>(sampler: &mut HeartRateSampler<P, ManualClock>, clock: &ManualClock) -> Vec<Reading> {
        let mut published = Vec::new();
        for _ in 0..(WINDOW / STEP) {
            clock.advance(STEP);
            published.extend(sampler.sample());
        }
        published
    }

    #[test]
    fn test_bpm_scaling() {
        assert_eq!(pulses_to_bpm(0), 0);
        assert_eq!(pulses_to_bpm(20), 80);
        assert_eq!(pulses_to_bpm(25), 100);
        assert_eq!(pulses_to_bpm(26), 104);
        assert_eq!(pulses_to_bpm(u32::MAX), u16::MAX);
    }

    #[test]
    fn test_window_publishes_once_and_resets() {
        let clock = ManualClock::default();
        // Active on 20 of the 150 samples in a window.
        let levels = (0..150).map(|i| i % 150 < 20).collect();
        let mut sampler = HeartRateSampler::new(PulsePattern::new(levels), clock.clone(), WINDOW);

        assert_eq!(run_window(&mut sampler, &clock), vec![Reading::HeartRate { bpm: 80 }]);
        assert_eq!(sampler.pulse_count(), 0);

        // The next window starts from the rearmed boundary.
        assert_eq!(run_window(&mut sampler, &clock), vec![Reading::HeartRate { bpm: 80 }]);
    }

    #[test]
    fn test_held_pulse_is_counted_every_sample() {
        let clock = ManualClock::default();
        let mut sampler = HeartRateSampler::new(PulsePattern::always(true), clock.clone(), WINDOW);

        for _ in 0..5 {
            clock.advance(STEP);
            assert_eq!(sampler.sample(), None);
        }
        assert_eq!(sampler.pulse_count(), 5);
    }

    #[test]
    fn test_sample_that_closes_window_is_counted() {
        let clock = ManualClock::default();
        let mut sampler = HeartRateSampler::new(PulsePattern::always(true), clock.clone(), WINDOW);

        clock.advance(WINDOW);
        assert_eq!(sampler.sample(), Some(Reading::HeartRate { bpm: 4 }));
    }

    #[test]
    fn test_window_survives_tick_wraparound() {
        let clock = ManualClock::starting_at(u32::MAX - 50);
        let mut sampler = HeartRateSampler::new(PulsePattern::always(false), clock.clone(), WINDOW);

        clock.advance(WINDOW - 1);
        assert_eq!(sampler.sample(), None);
        clock.advance(1);
        assert_eq!(sampler.sample(), Some(Reading::HeartRate { bpm: 0 }));
    }
}
