//! RF link byte source (ESP-IDF only).
//!
//! The radio module is a transparent serial bridge on UART1.  The driver
//! buffers received bytes in its ring buffer; [`RfUart::next_byte`] takes
//! them one at a time without blocking.

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{self, Uart, UartDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::{info, warn};

use crate::app::ports::ByteSource;

pub struct RfUart<'d> {
    driver: UartDriver<'d>,
    read_errors: u32,
}

impl<'d> RfUart<'d> {
    pub fn new(
        uart: impl Peripheral<P = impl Uart> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        baud_rate: u32,
    ) -> Result<Self, EspError> {
        let config = uart::config::Config::new().baudrate(Hertz(baud_rate));
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        info!("rf_uart: listening at {} baud", baud_rate);
        Ok(Self {
            driver,
            read_errors: 0,
        })
    }

    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}

impl ByteSource for RfUart<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.driver.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) => {
                self.read_errors = self.read_errors.wrapping_add(1);
                warn!("rf_uart: read failed: {}", e);
                None
            }
        }
    }
}
