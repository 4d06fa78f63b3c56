// HealthNode - Tasks
//
// Each task is a perpetual loop that only suspends at queue send/receive or
// its periodic delay.  A task returns only when the queue it feeds from or
// into has been torn down.

pub mod display;
pub mod heart_rate;
pub mod relay;
pub mod temperature;

use crate::error::NodeError;
use crate::queue::{QueueSender, Wait};

/// Enqueue `item` for `task`.  Returns `false` once the queue is closed and
/// the task should exit.
fn publish<T>(tx: &QueueSender<T>, item: T, wait: Wait, task: &str) -> bool {
    match tx.send_with(item, wait) {
        Ok(()) => true,
        Err(NodeError::QueueClosed) => {
            log::warn!("Downstream queue closed - exiting {} task", task);
            false
        }
        Err(e) => {
            log::warn!("{} task dropped an item: {}", task, e);
            true
        }
    }
}
