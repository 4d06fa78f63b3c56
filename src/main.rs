// HealthNode - Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging and peripherals (UART1, pulse pin, alert LED, ADC).
//   2. Build the node context (queues + serial link).
//   3. Send the Wi-Fi module its AT bring-up script over the serial link.
//   4. Spawn relay, display, temperature and heart rate tasks.
//
// On a host build the same pipeline runs against simulated hardware and the
// serial link is stdout.

use healthnode::config::Timing;
use healthnode::network;
use healthnode::{NodeContext, NodeHardware};

// ---------------------------------------------------------------------------
// Main (ESP32-C3)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin, PinDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};

    use healthnode::config::{PIN_ALERT_LED, PIN_PULSE, PIN_UART_RX, PIN_UART_TX, SERIAL_BAUD};
    use healthnode::drivers::{AlertLed, EspClock, OneshotAdc, PulsePin, UartSerial};

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("HealthNode firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    let uart_config = UartConfig::default().baudrate(Hertz(SERIAL_BAUD));
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio21, // PIN_UART_TX
        peripherals.pins.gpio20, // PIN_UART_RX
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )?;

    let pulse = PinDriver::input(peripherals.pins.gpio5.downgrade_input())?; // PIN_PULSE
    let led = PinDriver::output(peripherals.pins.gpio10.downgrade_output())?; // PIN_ALERT_LED
    let adc = OneshotAdc::new()?;
    log::info!(
        "Serial link on UART1 (TX GPIO{}, RX GPIO{}, {} baud), pulse GPIO{}, alert LED GPIO{}",
        PIN_UART_TX,
        PIN_UART_RX,
        SERIAL_BAUD,
        PIN_PULSE,
        PIN_ALERT_LED
    );

    let hardware = NodeHardware {
        adc,
        pulse: PulsePin::new(pulse),
        serial: UartSerial::new(uart),
        alert: AlertLed::new(led),
        clock: EspClock,
    };

    // ---- Context, bring-up, tasks ----------------------------------------
    let context = NodeContext::new(hardware, Timing::default());
    network::bring_up(context.link(), std::thread::sleep);

    let node = context.start()?;
    log::info!("Boot complete - entering normal operation");

    // Tasks never return in normal operation.
    node.join();
    log::error!("All tasks exited");
    Ok(())
}

// ---------------------------------------------------------------------------
// Main (host simulator)
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use healthnode::sim::{LogAlert, PulsePattern, SimulatedThermistor, StdoutSerial, SystemClock};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    log::info!("HealthNode simulator starting…");

    let hardware = NodeHardware {
        adc: SimulatedThermistor::new(),
        // ~19 active samples per 15 s window -> ~76 BPM
        pulse: PulsePattern::one_in(8),
        serial: StdoutSerial,
        alert: LogAlert,
        clock: SystemClock::new(),
    };

    let context = NodeContext::new(hardware, Timing::default());
    network::bring_up(context.link(), std::thread::sleep);

    let node = context.start()?;
    node.join();
    log::error!("All tasks exited");
    Ok(())
}
