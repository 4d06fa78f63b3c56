//! HealthNode - health-telemetry firmware library.
//!
//! Two producer tasks (temperature, heart rate) feed a bounded sensor queue.
//! The relay task writes a JSON record per reading to the serial link, runs
//! the alert predicate and hands the sample to the display task over a second
//! bounded queue.
//!
//! Everything except `drivers` builds on the host, so the pipeline can be
//! tested with:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu
//! ```

pub mod alert;
pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod hal;
pub mod network;
pub mod queue;
pub mod scheduler;
pub mod sim;
pub mod tasks;

#[cfg(target_os = "espidf")]
pub mod drivers;

pub use error::{HardwareFault, NodeError};
pub use events::{HealthSample, Reading, Source, Tick};
pub use scheduler::{Node, NodeContext, NodeHardware};
