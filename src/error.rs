// HealthNode - Error Types

use thiserror::Error;

/// Peripheral that raised a [`HardwareFault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    TemperatureAdc,
    PulsePin,
    SerialTx,
    AlertLed,
}

impl core::fmt::Display for Peripheral {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::TemperatureAdc => "temperature ADC",
            Self::PulsePin => "pulse pin",
            Self::SerialTx => "serial TX",
            Self::AlertLed => "alert LED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Ready condition never became true within the poll bound.
    Timeout { polls: u32 },
    /// Driver returned an error code.
    Driver { code: i32 },
}

/// A peripheral stopped responding or reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub struct HardwareFault {
    pub peripheral: Peripheral,
    pub kind: FaultKind,
}

impl core::fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            FaultKind::Timeout { polls } => {
                write!(f, "{} not ready after {} polls", self.peripheral, polls)
            }
            FaultKind::Driver { code } => {
                write!(f, "{} driver error ({})", self.peripheral, code)
            }
        }
    }
}

impl HardwareFault {
    pub const fn timeout(peripheral: Peripheral, polls: u32) -> Self {
        Self { peripheral, kind: FaultKind::Timeout { polls } }
    }

    pub const fn driver(peripheral: Peripheral, code: i32) -> Self {
        Self { peripheral, kind: FaultKind::Driver { code } }
    }
}

/// Recoverable conditions surfaced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error(transparent)]
    Hardware(#[from] HardwareFault),

    /// Bounded send gave up while the queue stayed full.
    #[error("queue full")]
    QueueFull,

    /// Bounded receive gave up while the queue stayed empty.
    #[error("queue empty")]
    QueueEmpty,

    /// Every peer on the other side of the queue is gone.
    #[error("queue closed")]
    QueueClosed,

    #[error("serial link unavailable")]
    LinkUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages_name_the_peripheral() {
        let fault = HardwareFault::timeout(Peripheral::SerialTx, 500);
        assert_eq!(fault.to_string(), "serial TX not ready after 500 polls");

        let fault = HardwareFault::driver(Peripheral::TemperatureAdc, -1);
        assert_eq!(fault.to_string(), "temperature ADC driver error (-1)");
    }

    #[test]
    fn test_hardware_fault_converts_into_node_error() {
        let fault = HardwareFault::driver(Peripheral::PulsePin, 3);
        let err: NodeError = fault.into();
        assert_eq!(err, NodeError::Hardware(fault));
        assert_eq!(err.to_string(), fault.to_string());
    }
}
