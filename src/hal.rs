// HealthNode - Hardware Abstraction
//
// The pipeline only talks to hardware through these traits.  Firmware
// implementations live in `drivers` (ESP-IDF), host implementations in `sim`.

use crate::error::{HardwareFault, Peripheral};
use crate::events::Tick;

/// 12-bit analog temperature channel.
pub trait TemperatureAdc: Send {
    fn read_raw(&mut self) -> Result<u16, HardwareFault>;
}

/// Digital pulse-sensor input.
pub trait PulseInput: Send {
    /// `true` while the pin is at its active level.
    fn is_active(&mut self) -> bool;
}

/// Byte-level serial transmitter.
pub trait SerialPort: Send {
    fn write_byte(&mut self, byte: u8) -> Result<(), HardwareFault>;

    /// Push out anything buffered.  Called once per line.
    fn flush(&mut self) -> Result<(), HardwareFault> {
        Ok(())
    }
}

/// Alert indicator (red LED).
pub trait AlertOutput: Send {
    fn set_active(&mut self, active: bool);
}

/// Monotonic tick counter shared by the sampling tasks.
pub trait TickSource: Clone + Send + 'static {
    fn now(&self) -> Tick;
}

/// Spin on `ready` until it returns `true`, giving up after `max_polls`.
///
/// Replaces open-ended `while !ready {}` register polling so a stalled
/// peripheral surfaces as a fault instead of hanging its task.
pub fn bounded_wait(
    peripheral: Peripheral,
    max_polls: u32,
    mut ready: impl FnMut() -> bool,
) -> Result<(), HardwareFault> {
    for _ in 0..max_polls {
        if ready() {
            return Ok(());
        }
        core::hint::spin_loop();
    }
    Err(HardwareFault::timeout(peripheral, max_polls))
}
