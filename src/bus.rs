// HealthNode - Shared Bus & Serial Link
//
// `SharedBus` is a scoped-acquisition lock around one peripheral: the device
// is only reachable inside `transaction`, and the guard drops on every exit
// path.  `SerialLink` is the single owned writer for the serial sink, built
// on it, so the relay and display lines never interleave.

use std::sync::{Arc, Mutex};

use crate::error::NodeError;
use crate::hal::SerialPort;

/// Thread-safe handle to a peripheral shared between tasks.
pub struct SharedBus<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for SharedBus<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> SharedBus<T> {
    pub fn new(device: T) -> Self {
        Self { inner: Arc::new(Mutex::new(device)) }
    }

    /// Run one bus transaction with exclusive access to the device.
    ///
    /// A previous holder that panicked leaves the device usable; its
    /// transaction is not resumed.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

/// Newline-terminated text output over a [`SerialPort`].
pub struct SerialLink<S> {
    bus: SharedBus<S>,
}

impl<S> Clone for SerialLink<S> {
    fn clone(&self) -> Self {
        Self { bus: self.bus.clone() }
    }
}

impl<S: SerialPort> SerialLink<S> {
    pub fn new(port: S) -> Self {
        Self { bus: SharedBus::new(port) }
    }

    /// Write `line` followed by `\n` as one uninterrupted transfer.
    pub fn write_line(&self, line: &str) -> Result<(), NodeError> {
        self.bus.transaction(|port| {
            write_bytes(port, line.as_bytes())?;
            write_bytes(port, b"\n")?;
            port.flush().map_err(|fault| link_down(fault.into()))
        })
    }

    /// Write `text` verbatim, no terminator added.
    pub fn write_raw(&self, text: &str) -> Result<(), NodeError> {
        self.bus.transaction(|port| {
            write_bytes(port, text.as_bytes())?;
            port.flush().map_err(|fault| link_down(fault.into()))
        })
    }
}

fn write_bytes<S: SerialPort>(port: &mut S, bytes: &[u8]) -> Result<(), NodeError> {
    for &byte in bytes {
        port.write_byte(byte).map_err(|fault| link_down(fault.into()))?;
    }
    Ok(())
}

fn link_down(cause: NodeError) -> NodeError {
    log::debug!("Serial write failed: {}", cause);
    NodeError::LinkUnavailable
}
