// HealthNode - Display Task
//
// Lowest-priority consumer.  Renders each relayed sample as a
// human-readable serial line.

use crate::bus::SerialLink;
use crate::config::Timing;
use crate::error::NodeError;
use crate::events::HealthSample;
use crate::format::display_line;
use crate::hal::SerialPort;
use crate::queue::QueueReceiver;

pub fn display_task<S: SerialPort>(link: SerialLink<S>, comm_rx: QueueReceiver<HealthSample>, timing: Timing) {
    log::info!("Display task started");

    loop {
        match comm_rx.recv_with(timing.display_recv) {
            Ok(sample) => {
                if let Err(e) = link.write_line(&display_line(&sample)) {
                    log::error!("Display line not sent: {}", e);
                }
            }
            Err(NodeError::QueueEmpty) => log::debug!("Display idle for {:?}", timing.display_recv),
            Err(_) => {
                log::warn!("Comm queue closed - exiting display task");
                return;
            }
        }
    }
}
