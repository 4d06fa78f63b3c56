// HealthNode - Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V), ESP8266 Wi-Fi module on UART1

use std::time::Duration;

use crate::queue::Wait;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_TEMPERATURE_ADC: u32 = 2; // D0/A0 - Analog temperature sensor (ADC1 CH2)
pub const PIN_PULSE: i32 = 5;           // D3    - Pulse sensor digital output (active HIGH)
pub const PIN_ALERT_LED: i32 = 10;      // D10   - Red alert LED
pub const PIN_UART_TX: i32 = 21;        // D6    - Serial link TX
pub const PIN_UART_RX: i32 = 20;        // D7    - Serial link RX (unused, bring-up is fire-and-forget)

// ---------------------------------------------------------------------------
// Serial Link
// ---------------------------------------------------------------------------
pub const SERIAL_BAUD: u32 = 9600; // 8N1
/// Polls of the TX FIFO before a byte write is declared stalled.
pub const SERIAL_TX_MAX_POLLS: u32 = 100_000;

// ---------------------------------------------------------------------------
// ADC / Temperature Conversion
// ---------------------------------------------------------------------------
pub const ADC_MAX_CODE: u16 = 4095;       // 12-bit
pub const ADC_REFERENCE_VOLTS: f32 = 3.3;
pub const TEMP_SCALE_PER_VOLT: f32 = 100.0; // 10 mV / °C sensor

// ---------------------------------------------------------------------------
// Heart Rate
// ---------------------------------------------------------------------------
/// A 15 s window scaled to one minute.
pub const BPM_PER_WINDOW_COUNT: u32 = 4;

// ---------------------------------------------------------------------------
// Alert Thresholds (strictly greater-than)
// ---------------------------------------------------------------------------
pub const TEMP_ALERT_CELSIUS: f32 = 38.0;
pub const HEART_RATE_ALERT_BPM: u16 = 100;

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------
pub const SENSOR_QUEUE_CAPACITY: usize = 10;
pub const COMM_QUEUE_CAPACITY: usize = 10;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_TEMPERATURE: usize = 4096;
pub const STACK_HEART_RATE: usize = 4096;
pub const STACK_RELAY: usize = 8192; // formats records
pub const STACK_DISPLAY: usize = 4096;
/// Host threads format through `env_logger` and need more room.
pub const HOST_MIN_STACK: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Task Priorities (FreeRTOS, higher preempts lower)
// ---------------------------------------------------------------------------
pub const PRIORITY_RELAY: u8 = 3;
pub const PRIORITY_TEMPERATURE: u8 = 2;
pub const PRIORITY_HEART_RATE: u8 = 2;
pub const PRIORITY_DISPLAY: u8 = 1;

// ---------------------------------------------------------------------------
// Timing (milliseconds, 1 tick = 1 ms)
// ---------------------------------------------------------------------------
pub const TICK_RATE_HZ: u32 = 1000;
pub const TEMPERATURE_PERIOD_MS: u64 = 1000;
pub const PULSE_SAMPLE_INTERVAL_MS: u64 = 100;
pub const HEART_RATE_WINDOW_MS: u32 = 15_000;

// ---------------------------------------------------------------------------
// Wi-Fi Bring-up (ESP8266 AT command script)
// ---------------------------------------------------------------------------
pub const WIFI_SSID: &str = "SSID";
pub const WIFI_PASSWORD: &str = "PASSWORD";
pub const WIFI_RESET_SETTLE_MS: u64 = 1000;
pub const WIFI_MODE_SETTLE_MS: u64 = 1000;
pub const WIFI_JOIN_SETTLE_MS: u64 = 5000;

/// Convert milliseconds to scheduler ticks.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms * (TICK_RATE_HZ / 1000)
}

/// Periods and per-suspension-point waits handed to the tasks.
///
/// `Timing::default()` is the firmware timing. Every queue operation waits
/// forever unless a bounded [`Wait`] is set here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub temperature_period: Duration,
    pub pulse_sample_interval: Duration,
    pub heart_rate_window_ticks: u32,
    pub sensor_send: Wait,
    pub relay_recv: Wait,
    pub comm_send: Wait,
    pub display_recv: Wait,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            temperature_period: Duration::from_millis(TEMPERATURE_PERIOD_MS),
            pulse_sample_interval: Duration::from_millis(PULSE_SAMPLE_INTERVAL_MS),
            heart_rate_window_ticks: ms_to_ticks(HEART_RATE_WINDOW_MS),
            sensor_send: Wait::Forever,
            relay_recv: Wait::Forever,
            comm_send: Wait::Forever,
            display_recv: Wait::Forever,
        }
    }
}

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_matches_firmware_constants() {
        let timing = Timing::default();
        assert_eq!(timing.temperature_period, Duration::from_secs(1));
        assert_eq!(timing.pulse_sample_interval, Duration::from_millis(100));
        assert_eq!(timing.heart_rate_window_ticks, 15_000);
        assert_eq!(timing.sensor_send, Wait::Forever);
        assert_eq!(timing.display_recv, Wait::Forever);
    }

    #[test]
    fn test_relay_outranks_samplers_outrank_display() {
        assert!(PRIORITY_RELAY > PRIORITY_TEMPERATURE);
        assert_eq!(PRIORITY_TEMPERATURE, PRIORITY_HEART_RATE);
        assert!(PRIORITY_HEART_RATE > PRIORITY_DISPLAY);
    }
}
