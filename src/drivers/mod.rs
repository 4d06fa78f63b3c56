// HealthNode - ESP-IDF Drivers
//
// Firmware implementations of the `hal` traits.

pub mod adc;
pub mod clock;
pub mod gpio;
pub mod uart;

pub use adc::OneshotAdc;
pub use clock::EspClock;
pub use gpio::{AlertLed, PulsePin};
pub use uart::UartSerial;
