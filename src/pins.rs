//! GPIO / peripheral pin assignments for the boiler relay board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Boiler relay
// ---------------------------------------------------------------------------

/// Relay coil driver.  Active-low: pin LOW energises the relay (boiler ON).
pub const RELAY_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status LEDs (discrete, active-low)
// ---------------------------------------------------------------------------

/// Red LED: rejected sentence, thermal override.
pub const LED_RED_GPIO: i32 = 11;
/// Blue LED: link activity.
pub const LED_BLUE_GPIO: i32 = 13;

/// Relay and LEDs are sunk by the MCU.
pub const OUTPUTS_ACTIVE_LOW: bool = true;

/// Pin level that switches an output ON.
pub const fn on_level() -> u32 {
    if OUTPUTS_ACTIVE_LOW { 0 } else { 1 }
}

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor, 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TEMP_ADC_CHANNEL: u32 = 8;

// ---------------------------------------------------------------------------
// RF link (transparent serial radio module on UART1)
// ---------------------------------------------------------------------------

pub const RF_UART_TX_GPIO: i32 = 17;
pub const RF_UART_RX_GPIO: i32 = 18;
