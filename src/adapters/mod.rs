//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                    |
//! |-------------|---------------|--------------------------------|
//! | `gpio`      | ActuatorPort  | Relay + LED output pins        |
//! | `hardware`  | ActuatorPort  | GPIO outputs                   |
//! |             | TimerPort     | esp_timer deadline + blink     |
//! |             | SensorPort    | Thermistor on ADC1             |
//! | `log_sink`  | EventSink     | Serial log output              |
//! | `rf_uart`   | ByteSource    | RF module on UART1 (ESP-IDF)   |

pub mod gpio;
pub mod hardware;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod rf_uart;
