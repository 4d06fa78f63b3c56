// HealthNode - Serial Line Formats
//
// Record:  {"temp":36.6,"hr":72,"time":1200}
// Display: Temp: 36.6C, HR: 72 BPM
//
// Both are written without the trailing newline; `SerialLink::write_line`
// adds it.

use crate::events::HealthSample;

/// Machine-readable record emitted by the relay.
pub fn record_line(sample: &HealthSample) -> String {
    format!(
        "{{\"temp\":{:.1},\"hr\":{},\"time\":{}}}",
        sample.temperature, sample.heart_rate, sample.timestamp
    )
}

/// Human-readable line emitted by the display stage.
pub fn display_line(sample: &HealthSample) -> String {
    format!("Temp: {:.1}C, HR: {} BPM", sample.temperature, sample.heart_rate)
}
