// HealthNode - Communication Relay Task
//
// Highest-priority consumer.  For every reading it updates the node's
// last-known snapshot, writes a JSON record to the serial link, runs the
// alert predicate on the fresh field and forwards the snapshot to the
// display stage.

use crate::alert::AlertLatch;
use crate::bus::SerialLink;
use crate::config::Timing;
use crate::error::NodeError;
use crate::events::{HealthSample, Reading};
use crate::format::record_line;
use crate::hal::{AlertOutput, SerialPort};
use crate::queue::{QueueReceiver, QueueSender};

/// Counters kept by the relay for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub records: u32,
    pub missing: u32,
    pub link_failures: u32,
}

pub struct CommunicationRelay<S, O> {
    link: SerialLink<S>,
    latch: AlertLatch<O>,
    snapshot: HealthSample,
    stats: RelayStats,
}

impl<S: SerialPort, O: AlertOutput> CommunicationRelay<S, O> {
    pub fn new(link: SerialLink<S>, latch: AlertLatch<O>) -> Self {
        Self { link, latch, snapshot: HealthSample::default(), stats: RelayStats::default() }
    }

    /// Process one reading.  Returns the sample to forward, or `None` when
    /// the producer reported that it has nothing this round.
    pub fn handle(&mut self, reading: Reading) -> Option<HealthSample> {
        if let Reading::Missing { source, fault } = reading {
            self.stats.missing = self.stats.missing.wrapping_add(1);
            log::warn!("{:?} sample missing: {}", source, fault);
            return None;
        }

        self.snapshot.merge(&reading);
        let sample = self.snapshot;

        match self.link.write_line(&record_line(&sample)) {
            Ok(()) => self.stats.records = self.stats.records.wrapping_add(1),
            Err(e) => {
                self.stats.link_failures = self.stats.link_failures.wrapping_add(1);
                log::error!("Record not sent: {}", e);
            }
        }

        if reading.crosses_threshold() {
            let active = self.latch.toggle();
            log::warn!(
                "Alert threshold crossed by {:?} (temp {:.1}, hr {}) - latch {}",
                reading.source(),
                sample.temperature,
                sample.heart_rate,
                if active { "ON" } else { "OFF" }
            );
        }

        Some(sample)
    }

    pub fn alert_active(&self) -> bool {
        self.latch.is_active()
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }
}

pub fn relay_task<S: SerialPort, O: AlertOutput>(
    mut relay: CommunicationRelay<S, O>,
    sensor_rx: QueueReceiver<Reading>,
    comm_tx: QueueSender<HealthSample>,
    timing: Timing,
) {
    log::info!("Relay task started");

    loop {
        let reading = match sensor_rx.recv_with(timing.relay_recv) {
            Ok(reading) => reading,
            Err(NodeError::QueueEmpty) => {
                log::warn!("No sensor readings within {:?}", timing.relay_recv);
                continue;
            }
            Err(_) => {
                log::warn!("Sensor queue closed - exiting relay task");
                return;
            }
        };

        if let Some(sample) = relay.handle(reading) {
            if !super::publish(&comm_tx, sample, timing.comm_send, "relay") {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::error::{HardwareFault, Peripheral};
    use crate::events::Source;
    use crate::queue::{queue, Wait};
    use crate::sim::{CaptureSerial, LogAlert};
    use crate::tasks::heart_rate::pulses_to_bpm;
    use crate::tasks::temperature::raw_to_celsius;

    fn relay() -> (CommunicationRelay<CaptureSerial, LogAlert>, CaptureSerial) {
        let capture = CaptureSerial::new();
        let relay = CommunicationRelay::new(SerialLink::new(capture.clone()), AlertLatch::new(LogAlert));
        (relay, capture)
    }

    #[test]
    fn test_hot_temperature_writes_record_and_toggles_latch() {
        let (mut relay, capture) = relay();
        let celsius = raw_to_celsius(512);

        let forwarded = relay.handle(Reading::Temperature { celsius, tick: 3000 });

        assert_eq!(forwarded, Some(HealthSample { temperature: celsius, heart_rate: 0, timestamp: 3000 }));
        assert_eq!(capture.lines(), vec![r#"{"temp":41.3,"hr":0,"time":3000}"#.to_string()]);
        assert!(relay.alert_active());
    }

    #[test]
    fn test_normal_heart_rate_leaves_latch_unchanged() {
        let (mut relay, capture) = relay();

        relay.handle(Reading::HeartRate { bpm: pulses_to_bpm(20) });

        assert_eq!(capture.lines(), vec![r#"{"temp":0.0,"hr":80,"time":0}"#.to_string()]);
        assert!(!relay.alert_active());
    }

    #[test]
    fn test_heart_rate_boundary() {
        let (mut relay, _capture) = relay();

        relay.handle(Reading::HeartRate { bpm: pulses_to_bpm(25) });
        assert!(!relay.alert_active());

        relay.handle(Reading::HeartRate { bpm: pulses_to_bpm(26) });
        assert!(relay.alert_active());
    }

    #[test]
    fn test_consecutive_alerts_toggle_back() {
        let (mut relay, _capture) = relay();

        relay.handle(Reading::Temperature { celsius: 39.0, tick: 1 });
        relay.handle(Reading::Temperature { celsius: 39.5, tick: 2 });

        assert!(!relay.alert_active());
    }

    #[test]
    fn test_stale_hot_temperature_does_not_retrigger_on_heart_rate() {
        let (mut relay, capture) = relay();

        relay.handle(Reading::Temperature { celsius: 40.0, tick: 1000 });
        assert!(relay.alert_active());

        relay.handle(Reading::HeartRate { bpm: 80 });
        assert!(relay.alert_active());
        assert_eq!(
            capture.lines().last().map(String::as_str),
            Some(r#"{"temp":40.0,"hr":80,"time":1000}"#)
        );
    }

    #[test]
    fn test_missing_reading_is_counted_not_forwarded() {
        let (mut relay, capture) = relay();
        let fault = HardwareFault::timeout(Peripheral::TemperatureAdc, 100);

        let forwarded = relay.handle(Reading::Missing { source: Source::Temperature, fault });

        assert_eq!(forwarded, None);
        assert!(capture.text().is_empty());
        assert_eq!(relay.stats(), RelayStats { records: 0, missing: 1, link_failures: 0 });
    }

    #[test]
    fn test_link_failure_still_alerts_and_forwards() {
        let (mut relay, capture) = relay();
        capture.set_failing(true);

        let forwarded = relay.handle(Reading::HeartRate { bpm: 120 });

        assert_eq!(forwarded.map(|s| s.heart_rate), Some(120));
        assert!(relay.alert_active());
        assert_eq!(relay.stats().link_failures, 1);
    }

    #[test]
    fn test_full_comm_queue_drops_sample_and_relay_keeps_going() {
        let (relay, capture) = relay();
        let (sensor_tx, sensor_rx) = queue(10);
        let (comm_tx, comm_rx) = queue(1);
        let timing = Timing { comm_send: Wait::For(Duration::from_millis(10)), ..Timing::default() };

        for tick in 1..=3 {
            sensor_tx.send(Reading::Temperature { celsius: 36.5, tick }).unwrap();
        }
        drop(sensor_tx);

        // Nobody drains the comm queue: only the first sample fits.
        relay_task(relay, sensor_rx, comm_tx, timing);

        assert_eq!(
            capture.lines(),
            vec![
                r#"{"temp":36.5,"hr":0,"time":1}"#.to_string(),
                r#"{"temp":36.5,"hr":0,"time":2}"#.to_string(),
                r#"{"temp":36.5,"hr":0,"time":3}"#.to_string(),
            ]
        );
        assert_eq!(comm_rx.len(), 1);
        assert_eq!(comm_rx.recv().map(|s| s.timestamp), Ok(1));
        assert!(comm_rx.is_empty());
    }

    #[test]
    fn test_receive_timeout_does_not_stop_relay() {
        let (relay, capture) = relay();
        let (sensor_tx, sensor_rx) = queue(10);
        let (comm_tx, comm_rx) = queue(10);
        let timing = Timing { relay_recv: Wait::For(Duration::from_millis(5)), ..Timing::default() };

        let worker = thread::spawn(move || relay_task(relay, sensor_rx, comm_tx, timing));

        // Several receive timeouts expire before the first reading arrives.
        thread::sleep(Duration::from_millis(50));
        sensor_tx.send(Reading::HeartRate { bpm: 72 }).unwrap();
        drop(sensor_tx);
        worker.join().unwrap();

        assert_eq!(capture.lines(), vec![r#"{"temp":0.0,"hr":72,"time":0}"#.to_string()]);
        assert_eq!(comm_rx.recv().map(|s| s.heart_rate), Ok(72));
    }
}
