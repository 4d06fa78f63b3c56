// HealthNode - Task Table & Startup
//
// `NodeContext` replaces the global queue and task handles: `main` builds it
// once, then `start` moves every queue end and device into the task that owns
// it.  On ESP-IDF each `std::thread` is a FreeRTOS task and gets its fixed
// priority from the task table.

use std::thread::{self, JoinHandle};

use crate::alert::AlertLatch;
use crate::bus::SerialLink;
use crate::config::*;
use crate::events::{HealthSample, Reading};
use crate::hal::{AlertOutput, PulseInput, SerialPort, TemperatureAdc, TickSource};
use crate::queue::{queue, QueueReceiver, QueueSender};
use crate::tasks::display::display_task;
use crate::tasks::heart_rate::{heart_rate_task, HeartRateSampler};
use crate::tasks::relay::{relay_task, CommunicationRelay};
use crate::tasks::temperature::{temperature_task, TemperatureSampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    pub priority: u8,
    pub stack_size: usize,
}

pub const TEMPERATURE_TASK: TaskSpec = TaskSpec {
    name: "temperature",
    priority: PRIORITY_TEMPERATURE,
    stack_size: STACK_TEMPERATURE,
};

pub const HEART_RATE_TASK: TaskSpec = TaskSpec {
    name: "heart_rate",
    priority: PRIORITY_HEART_RATE,
    stack_size: STACK_HEART_RATE,
};

pub const RELAY_TASK: TaskSpec = TaskSpec {
    name: "relay",
    priority: PRIORITY_RELAY,
    stack_size: STACK_RELAY,
};

pub const DISPLAY_TASK: TaskSpec = TaskSpec {
    name: "display",
    priority: PRIORITY_DISPLAY,
    stack_size: STACK_DISPLAY,
};

/// Spawn `body` with the priority and stack size from the task table.
pub fn spawn<F>(task: &TaskSpec, body: F) -> anyhow::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    #[cfg(target_os = "espidf")]
    let stack_size = {
        // Picked up by the next std::thread spawn.
        esp_idf_hal::task::thread::ThreadSpawnConfiguration {
            stack_size: task.stack_size,
            priority: task.priority,
            ..Default::default()
        }
        .set()?;
        task.stack_size
    };

    #[cfg(not(target_os = "espidf"))]
    let stack_size = {
        log::debug!("Task {} priority {} is advisory on host", task.name, task.priority);
        task.stack_size.max(HOST_MIN_STACK)
    };

    let handle = thread::Builder::new()
        .name(task.name.into())
        .stack_size(stack_size)
        .spawn(body)?;

    #[cfg(target_os = "espidf")]
    esp_idf_hal::task::thread::ThreadSpawnConfiguration::default().set()?;

    Ok(handle)
}

/// Devices the pipeline runs on.
pub struct NodeHardware<A, P, S, O, C> {
    pub adc: A,
    pub pulse: P,
    pub serial: S,
    pub alert: O,
    pub clock: C,
}

pub struct NodeContext<A, P, S, O, C> {
    adc: A,
    pulse: P,
    alert: O,
    clock: C,
    link: SerialLink<S>,
    sensor_tx: QueueSender<Reading>,
    sensor_rx: QueueReceiver<Reading>,
    comm_tx: QueueSender<HealthSample>,
    comm_rx: QueueReceiver<HealthSample>,
    timing: Timing,
}

impl<A, P, S, O, C> NodeContext<A, P, S, O, C>
where
    A: TemperatureAdc + 'static,
    P: PulseInput + 'static,
    S: SerialPort + 'static,
    O: AlertOutput + 'static,
    C: TickSource,
{
    /// Create the queues and the serial link.  Nothing runs yet.
    pub fn new(hw: NodeHardware<A, P, S, O, C>, timing: Timing) -> Self {
        let (sensor_tx, sensor_rx) = queue(SENSOR_QUEUE_CAPACITY);
        let (comm_tx, comm_rx) = queue(COMM_QUEUE_CAPACITY);
        Self {
            adc: hw.adc,
            pulse: hw.pulse,
            alert: hw.alert,
            clock: hw.clock,
            link: SerialLink::new(hw.serial),
            sensor_tx,
            sensor_rx,
            comm_tx,
            comm_rx,
            timing,
        }
    }

    /// The serial link, for boot-time output before the tasks start.
    pub fn link(&self) -> &SerialLink<S> {
        &self.link
    }

    /// Spawn the four pipeline tasks, consumers first.
    pub fn start(self) -> anyhow::Result<Node> {
        let Self { adc, pulse, alert, clock, link, sensor_tx, sensor_rx, comm_tx, comm_rx, timing } = self;
        let mut handles = Vec::with_capacity(4);

        let display_link = link.clone();
        handles.push(spawn(&DISPLAY_TASK, move || display_task(display_link, comm_rx, timing))?);

        let relay = CommunicationRelay::new(link, AlertLatch::new(alert));
        handles.push(spawn(&RELAY_TASK, move || relay_task(relay, sensor_rx, comm_tx, timing))?);

        let sampler = TemperatureSampler::new(adc, clock.clone());
        let temperature_tx = sensor_tx.clone();
        handles.push(spawn(&TEMPERATURE_TASK, move || temperature_task(sampler, temperature_tx, timing))?);

        let sampler = HeartRateSampler::new(pulse, clock, timing.heart_rate_window_ticks);
        handles.push(spawn(&HEART_RATE_TASK, move || heart_rate_task(sampler, sensor_tx, timing))?);

        log::info!("Pipeline started ({} tasks)", handles.len());
        Ok(Node { handles })
    }
}

/// Handles of the running pipeline tasks.
pub struct Node {
    handles: Vec<JoinHandle<()>>,
}

impl Node {
    /// Block until every task has returned.  In normal operation this never
    /// happens.
    pub fn join(self) {
        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("?").to_owned();
            if handle.join().is_err() {
                log::error!("Task {} panicked", name);
            }
        }
    }
}
