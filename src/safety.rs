//! Thermal override with hysteresis.
//!
//! While the relay is commanded OFF (or the override is already latched) the
//! main loop samples the boiler temperature every pass and feeds it here.
//!
//! ```text
//!   emergency ──────────────┐             ┌──────────── clear
//!                           ▼             ▼
//!   ─────────────────────── critical ──── critical + hysteresis ──▶ °C
//!        t < critical → latch    (band: no change)    t > band → release
//! ```
//!
//! The comparison direction is kept exactly as the deployed firmware has it:
//! the relay is forced ON when the temperature falls *below* the threshold.

use log::{error, info};

/// Change of the emergency latch produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalTransition {
    Entered,
    Cleared,
}

/// Hysteresis latch for the emergency override (EmergencyFlag).
pub struct ThermalGuard {
    critical_centi: i32,
    hysteresis_centi: i32,
    active: bool,
    last_centi: Option<i32>,
}

impl ThermalGuard {
    pub fn new(critical_centi: i32, hysteresis_centi: i32) -> Self {
        Self {
            critical_centi,
            hysteresis_centi,
            active: false,
            last_centi: None,
        }
    }

    /// Feed one temperature sample (1/100 °C).
    ///
    /// Returns the latch transition, if any.  Inside the band the latch keeps
    /// its previous value.
    pub fn evaluate(&mut self, temp_centi: i32) -> Option<ThermalTransition> {
        self.last_centi = Some(temp_centi);
        let was_active = self.active;

        if temp_centi < self.critical_centi {
            self.active = true;
        }
        if temp_centi > self.critical_centi.saturating_add(self.hysteresis_centi) {
            self.active = false;
        }

        match (was_active, self.active) {
            (false, true) => {
                error!(
                    "THERMAL OVERRIDE SET: {} < {} (1/100 C)",
                    temp_centi, self.critical_centi
                );
                Some(ThermalTransition::Entered)
            }
            (true, false) => {
                info!(
                    "THERMAL OVERRIDE CLEARED: {} > {} (1/100 C)",
                    temp_centi,
                    self.release_centi()
                );
                Some(ThermalTransition::Cleared)
            }
            _ => None,
        }
    }

    /// True while the override is latched.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Most recent sample, if any was taken.
    pub fn last_temperature(&self) -> Option<i32> {
        self.last_centi
    }

    /// Temperature that must be exceeded to release the latch.
    pub fn release_centi(&self) -> i32 {
        self.critical_centi.saturating_add(self.hysteresis_centi)
    }
}
