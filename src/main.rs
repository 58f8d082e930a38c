//! Boiler Relay Firmware: Main Entry Point
//!
//! Event-driven main loop around the hexagonal core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            RfUart          LogEventSink       │
//! │  (Actuator+Timer+Sensor)    (ByteSource)    (EventSink)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            BoilerService (pure logic)                  │    │
//! │  │  Receiver · Validator · Dispatcher · Relay FSM         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  esp_timer callbacks ──▶ EventQueue ──▶ main loop ◀── RF UART  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use boiler::adapters::gpio::GpioActuators;
use boiler::adapters::hardware::HardwareAdapter;
use boiler::adapters::log_sink::LogEventSink;
use boiler::adapters::rf_uart::RfUart;
use boiler::app::events::AppEvent;
use boiler::app::ports::{ByteSource, EventSink};
use boiler::app::service::BoilerService;
use boiler::config::BoilerConfig;
use boiler::drivers::{hw_init, hw_timer, watchdog::Watchdog};
use boiler::events;
use boiler::pins;
use boiler::sensors::temperature::Thermistor;

/// Main loop period.  Bounds command latency and the sampling rate.
const LOOP_PERIOD_MS: u32 = 10;

/// Upper bound on RF bytes consumed per pass, so a noisy link cannot
/// starve the watchdog feed.
const RX_BYTES_PER_PASS: usize = 256;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Boiler relay v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = BoilerConfig::default();
    let mut app = BoilerService::new(config.clone())?;

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    if let Err(e) = hw_init::init_peripherals() {
        // Without the ADC the override cannot work; the relay path can.
        warn!("hw_init: {}; thermistor reads will report a fault", e);
    }

    // SAFETY: each pin number is claimed exactly once here and nowhere
    // else in the firmware; pins.rs is the single assignment table.
    let (relay, red, blue, rf_tx, rf_rx) = unsafe {
        (
            AnyOutputPin::new(pins::RELAY_GPIO),
            AnyOutputPin::new(pins::LED_RED_GPIO),
            AnyOutputPin::new(pins::LED_BLUE_GPIO),
            AnyIOPin::new(pins::RF_UART_TX_GPIO),
            AnyIOPin::new(pins::RF_UART_RX_GPIO),
        )
    };
    let outputs = GpioActuators::new(
        PinDriver::output(relay)?,
        PinDriver::output(red)?,
        PinDriver::output(blue)?,
        pins::OUTPUTS_ACTIVE_LOW,
    );
    let mut hw = HardwareAdapter::new(outputs, Thermistor::new(pins::TEMP_ADC_CHANNEL));
    let mut rf = RfUart::new(peripherals.uart1, rf_tx, rf_rx, config.rf_baud_rate)?;
    let mut log_sink = LogEventSink::new();

    // ── 3. Arm timers, then power-on self test ────────────────
    // The timers must exist before start() restarts the deadline and
    // blinks the LEDs.
    hw_timer::start_timers(config.deadline_timeout_ms)?;
    app.start(&mut hw, &mut log_sink);
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    info!("System ready. Entering event loop.");

    // ── 4. Event loop ─────────────────────────────────────────
    let telemetry_period = Duration::from_secs(u64::from(config.telemetry_interval_secs));
    let mut last_telemetry = Instant::now();

    loop {
        // The esp_timer task is the queue's only producer; RF bytes are
        // fed straight in from this task.
        for _ in 0..RX_BYTES_PER_PASS {
            let Some(byte) = rf.next_byte() else { break };
            app.on_byte_received(byte, &mut hw, &mut log_sink);
        }

        events::drain_events(|event| app.handle_event(event, &mut hw, &mut log_sink));

        app.tick(&mut hw, &mut log_sink);

        if last_telemetry.elapsed() >= telemetry_period {
            last_telemetry = Instant::now();
            log_sink.emit(&AppEvent::Telemetry(app.build_telemetry()));
        }

        watchdog.feed();
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
