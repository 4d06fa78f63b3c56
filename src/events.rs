// HealthNode - Pipeline Data Types

use crate::config::{HEART_RATE_ALERT_BPM, TEMP_ALERT_CELSIUS};
use crate::error::HardwareFault;

/// Monotonic scheduler tick count (1 tick = 1 ms), wraps at `u32::MAX`.
pub type Tick = u32;

// ---------------------------------------------------------------------------
// Health Sample (relay snapshot, carried on the comm queue)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HealthSample {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Beats per minute.
    pub heart_rate: u16,
    /// Tick of the temperature read that produced `temperature`.
    pub timestamp: Tick,
}

impl HealthSample {
    /// Fold a reading into the snapshot.  Only the fields owned by the
    /// reading's producer change.
    pub fn merge(&mut self, reading: &Reading) {
        match *reading {
            Reading::Temperature { celsius, tick } => {
                self.temperature = celsius;
                self.timestamp = tick;
            }
            Reading::HeartRate { bpm } => self.heart_rate = bpm,
            Reading::Missing { .. } => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Readings (sensor queue)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Temperature,
    HeartRate,
}

/// One producer's view, tagged with the producer that made it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Temperature { celsius: f32, tick: Tick },
    HeartRate { bpm: u16 },
    /// The producer could not sample; no value this round.
    Missing { source: Source, fault: HardwareFault },
}

impl Reading {
    pub fn source(&self) -> Source {
        match self {
            Self::Temperature { .. } => Source::Temperature,
            Self::HeartRate { .. } => Source::HeartRate,
            Self::Missing { source, .. } => *source,
        }
    }

    /// Alert predicate, evaluated on the field this reading carries.
    pub fn crosses_threshold(&self) -> bool {
        match *self {
            Self::Temperature { celsius, .. } => celsius > TEMP_ALERT_CELSIUS,
            Self::HeartRate { bpm } => bpm > HEART_RATE_ALERT_BPM,
            Self::Missing { .. } => false,
        }
    }
}
