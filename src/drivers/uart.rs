// HealthNode - Serial Link UART Driver
//
// UART1 at 9600 8N1.  Bytes are pushed with non-blocking writes; a TX FIFO
// that stays full past the poll bound is reported as a hardware fault instead
// of stalling the writer forever.

use esp_idf_hal::uart::UartDriver;

use crate::config::SERIAL_TX_MAX_POLLS;
use crate::error::{HardwareFault, Peripheral};
use crate::hal::{bounded_wait, SerialPort};

pub struct UartSerial<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartSerial<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl SerialPort for UartSerial<'static> {
    fn write_byte(&mut self, byte: u8) -> Result<(), HardwareFault> {
        let mut error = None;
        let sent = bounded_wait(Peripheral::SerialTx, SERIAL_TX_MAX_POLLS, || {
            match self.uart.write_nb(&[byte]) {
                Ok(n) => n == 1,
                Err(e) => {
                    error = Some(e.code());
                    true
                }
            }
        });
        match error {
            Some(code) => Err(HardwareFault::driver(Peripheral::SerialTx, code)),
            None => sent,
        }
    }
}
