// HealthNode - Wi-Fi Module Bring-up
//
// Fire-and-forget AT command script for the ESP8266 sharing the serial link.
// Sent once at boot; responses are never read.

use std::time::Duration;

use crate::bus::SerialLink;
use crate::config::*;
use crate::hal::SerialPort;

/// One command and how long to let the module settle afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BringupStep {
    pub command: String,
    pub settle: Duration,
}

pub fn bringup_script() -> Vec<BringupStep> {
    vec![
        BringupStep {
            command: "AT+RST\r\n".into(),
            settle: Duration::from_millis(WIFI_RESET_SETTLE_MS),
        },
        BringupStep {
            command: "AT+CWMODE=1\r\n".into(),
            settle: Duration::from_millis(WIFI_MODE_SETTLE_MS),
        },
        BringupStep {
            command: format!("AT+CWJAP=\"{}\",\"{}\"\r\n", WIFI_SSID, WIFI_PASSWORD),
            settle: Duration::from_millis(WIFI_JOIN_SETTLE_MS),
        },
    ]
}

/// Send the script, pausing with `delay` after each command.  A failed write
/// is logged and the script carries on.
pub fn bring_up<S: SerialPort>(link: &SerialLink<S>, mut delay: impl FnMut(Duration)) {
    log::info!("Wi-Fi bring-up starting");

    for step in bringup_script() {
        if let Err(e) = link.write_raw(&step.command) {
            log::warn!("Wi-Fi command {:?} not sent: {}", step.command.trim_end(), e);
        }
        delay(step.settle);
    }

    log::info!("Wi-Fi bring-up script sent");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CaptureSerial;

    #[test]
    fn test_script_is_sent_in_order_with_settle_delays() {
        let capture = CaptureSerial::new();
        let link = SerialLink::new(capture.clone());
        let mut delays = Vec::new();

        bring_up(&link, |d| delays.push(d));

        assert_eq!(capture.text(), "AT+RST\r\nAT+CWMODE=1\r\nAT+CWJAP=\"SSID\",\"PASSWORD\"\r\n");
        assert_eq!(
            delays,
            vec![Duration::from_secs(1), Duration::from_secs(1), Duration::from_secs(5)]
        );
    }

    #[test]
    fn test_failed_writes_do_not_stop_the_script() {
        let capture = CaptureSerial::new();
        capture.set_failing(true);
        let link = SerialLink::new(capture.clone());
        let mut steps = 0;

        bring_up(&link, |_| steps += 1);

        assert_eq!(steps, 3);
        assert!(capture.text().is_empty());
    }
}
