//! Two-LED status indicator.
//!
//! | LED      | Colour | Meaning                                   |
//! |----------|--------|-------------------------------------------|
//! | Activity | blue   | a frame was received                      |
//! | Error    | red    | a frame was rejected, or thermal override |
//!
//! Both LEDs share one one-shot blink timer.  Starting a blink on either
//! LED restarts that timer, and its expiry turns *both* LEDs off, so an
//! overlapping blink cuts the earlier one short or stretches it.  This is a
//! coarse diagnostic, nothing depends on its timing.

use crate::app::ports::{ActuatorPort, TimerPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    /// Blue, link activity.
    Activity,
    /// Red, errors and emergency.
    Error,
}

impl Led {
    pub const ALL: [Led; 2] = [Led::Activity, Led::Error];

    fn index(self) -> usize {
        match self {
            Self::Activity => 0,
            Self::Error => 1,
        }
    }
}

/// Mirror of what was last written to the LEDs.
#[derive(Default)]
pub struct StatusIndicator {
    lit: [bool; 2],
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Light `led` and (re)start the shared timeout.
    pub fn blink(&mut self, led: Led, duration_ms: u32, hw: &mut (impl ActuatorPort + TimerPort)) {
        self.set(led, true, hw);
        hw.start_blink(duration_ms);
    }

    /// Drive `led` without touching the timeout.
    pub fn set(&mut self, led: Led, on: bool, hw: &mut impl ActuatorPort) {
        hw.set_led(led, on);
        self.lit[led.index()] = on;
    }

    /// Shared timeout elapsed: both LEDs off.
    pub fn on_blink_expired(&mut self, hw: &mut impl ActuatorPort) {
        for led in Led::ALL {
            self.set(led, false, hw);
        }
    }

    pub fn is_lit(&self, led: Led) -> bool {
        self.lit[led.index()]
    }
}
