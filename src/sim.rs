// HealthNode - Host Simulator Hardware
//
// Stand-ins for the ESP32 peripherals so the full pipeline runs on a PC and
// under `cargo test`.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::{ADC_MAX_CODE, ADC_REFERENCE_VOLTS, TEMP_SCALE_PER_VOLT};
use crate::error::{HardwareFault, Peripheral};
use crate::events::Tick;
use crate::hal::{AlertOutput, PulseInput, SerialPort, TemperatureAdc, TickSource};

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    fn now(&self) -> Tick {
        // Truncation is the wrap-around of a 32-bit tick counter.
        self.origin.elapsed().as_millis() as Tick
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ticks: Arc<AtomicU32>,
}

impl ManualClock {
    pub fn starting_at(tick: Tick) -> Self {
        Self { ticks: Arc::new(AtomicU32::new(tick)) }
    }

    pub fn advance(&self, ticks: Tick) {
        // fetch_add wraps on overflow, like the hardware counter.
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }
}

impl TickSource for ManualClock {
    fn now(&self) -> Tick {
        self.ticks.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// Body temperature drifting between roughly 36 °C and 39.5 °C.
pub struct SimulatedThermistor {
    start: Instant,
}

impl SimulatedThermistor {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SimulatedThermistor {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureAdc for SimulatedThermistor {
    fn read_raw(&mut self) -> Result<u16, HardwareFault> {
        let t = self.start.elapsed().as_secs_f32();
        let celsius = 37.75 + 1.75 * (t * 0.1).sin();
        Ok(celsius_to_code(celsius))
    }
}

/// Inverse of the firmware conversion, rounded to the nearest code.
pub fn celsius_to_code(celsius: f32) -> u16 {
    let code = celsius / TEMP_SCALE_PER_VOLT * f32::from(ADC_MAX_CODE) / ADC_REFERENCE_VOLTS;
    code.round().clamp(0.0, f32::from(ADC_MAX_CODE)) as u16
}

/// Replays a fixed list of ADC results, then repeats the last one.
pub struct ScriptedAdc {
    script: VecDeque<Result<u16, HardwareFault>>,
    last: Result<u16, HardwareFault>,
}

impl ScriptedAdc {
    pub fn new(script: impl IntoIterator<Item = Result<u16, HardwareFault>>) -> Self {
        Self { script: script.into_iter().collect(), last: Ok(0) }
    }

    pub fn constant(code: u16) -> Self {
        Self::new([Ok(code)])
    }
}

impl TemperatureAdc for ScriptedAdc {
    fn read_raw(&mut self) -> Result<u16, HardwareFault> {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

// ---------------------------------------------------------------------------
// Pulse
// ---------------------------------------------------------------------------

/// Cycles through a fixed pin-level pattern, one entry per sample.
pub struct PulsePattern {
    levels: Vec<bool>,
    index: usize,
}

impl PulsePattern {
    pub fn new(levels: Vec<bool>) -> Self {
        Self { levels, index: 0 }
    }

    /// Active on one sample out of every `every`.
    pub fn one_in(every: usize) -> Self {
        let every = every.max(1);
        Self::new((0..every).map(|i| i == 0).collect())
    }

    pub fn always(active: bool) -> Self {
        Self::new(vec![active])
    }
}

impl PulseInput for PulsePattern {
    fn is_active(&mut self) -> bool {
        if self.levels.is_empty() {
            return false;
        }
        let level = self.levels[self.index];
        self.index = (self.index + 1) % self.levels.len();
        level
    }
}

// ---------------------------------------------------------------------------
// Serial
// ---------------------------------------------------------------------------

/// Serial output to the process's stdout.
#[derive(Debug, Default)]
pub struct StdoutSerial;

impl SerialPort for StdoutSerial {
    fn write_byte(&mut self, byte: u8) -> Result<(), HardwareFault> {
        std::io::stdout()
            .write_all(&[byte])
            .map_err(|e| HardwareFault::driver(Peripheral::SerialTx, e.raw_os_error().unwrap_or(-1)))
    }

    fn flush(&mut self) -> Result<(), HardwareFault> {
        std::io::stdout()
            .flush()
            .map_err(|e| HardwareFault::driver(Peripheral::SerialTx, e.raw_os_error().unwrap_or(-1)))
    }
}

/// In-memory serial capture.  Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureSerial {
    bytes: Arc<Mutex<Vec<u8>>>,
    failing: Arc<AtomicBool>,
}

impl CaptureSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn text(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Complete lines received so far.
    pub fn lines(&self) -> Vec<String> {
        let text = self.text();
        let complete = match text.rfind('\n') {
            Some(end) => &text[..end],
            None => return Vec::new(),
        };
        complete.split('\n').map(str::to_owned).collect()
    }
}

impl SerialPort for CaptureSerial {
    fn write_byte(&mut self, byte: u8) -> Result<(), HardwareFault> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(HardwareFault::timeout(Peripheral::SerialTx, 1));
        }
        self.bytes.lock().unwrap_or_else(|p| p.into_inner()).push(byte);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Alert LED
// ---------------------------------------------------------------------------

/// Logs the red LED state instead of driving a pin.
#[derive(Debug, Default)]
pub struct LogAlert;

impl AlertOutput for LogAlert {
    fn set_active(&mut self, active: bool) {
        log::debug!("Alert LED {}", if active { "ON" } else { "OFF" });
    }
}
