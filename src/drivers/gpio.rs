// HealthNode - GPIO Drivers
//
// Pulse sensor input and red alert LED.

use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};

use crate::hal::{AlertOutput, PulseInput};

/// Pulse sensor digital output, active HIGH.
pub struct PulsePin<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
}

impl<'d> PulsePin<'d> {
    pub fn new(pin: PinDriver<'d, AnyInputPin, Input>) -> Self {
        Self { pin }
    }
}

impl PulseInput for PulsePin<'static> {
    fn is_active(&mut self) -> bool {
        self.pin.is_high()
    }
}

/// Red LED driven by the alert latch.
pub struct AlertLed<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> AlertLed<'d> {
    pub fn new(pin: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        Self { pin }
    }
}

impl AlertOutput for AlertLed<'static> {
    fn set_active(&mut self, active: bool) {
        let result = if active { self.pin.set_high() } else { self.pin.set_low() };
        if let Err(e) = result {
            log::warn!("Alert LED write failed: {}", e);
        }
    }
}
