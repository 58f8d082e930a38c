//! Relay fail-safe state machine.
//!
//! Two orthogonal pieces of state decide the physical output:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              │ EMERGENCY_INACTIVE │ EMERGENCY_ACTIVE     │
//! │  ────────────┼────────────────────┼───────────────────── │
//! │  RELAY_ON    │ output ON          │ output ON            │
//! │  RELAY_OFF   │ output OFF         │ output ON (override) │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! - `ON` command → commanded ON.
//! - `OFF` command → commanded OFF (the caller restarts the deadline).
//! - Deadline expiry → commanded ON, whatever the emergency latch says.
//! - Temperature samples (only taken while commanded OFF or latched) drive
//!   the [`ThermalGuard`].
//!
//! The machine itself never touches hardware; [`RelayFsm::output`] is what
//! the service writes to the relay pin every main-loop pass.

use core::fmt;

use log::{info, warn};

use crate::protocol::RelayCommand;
use crate::safety::{ThermalGuard, ThermalTransition};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Relay state, both as commanded and as driven onto the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RelayState {
    On,
    Off,
}

impl RelayState {
    pub fn name(self) -> &'static str {
        match self {
            Self::On => "RELAY_ON",
            Self::Off => "RELAY_OFF",
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<RelayCommand> for RelayState {
    fn from(cmd: RelayCommand) -> Self {
        match cmd {
            RelayCommand::On => Self::On,
            RelayCommand::Off => Self::Off,
        }
    }
}

/// Change of the driven output caused by one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RelayState,
    pub to: RelayState,
}

// ---------------------------------------------------------------------------
// FSM
// ---------------------------------------------------------------------------

pub struct RelayFsm {
    commanded: RelayState,
    guard: ThermalGuard,
    fail_safe_trips: u32,
}

impl RelayFsm {
    /// Boot state: RELAY_ON, EMERGENCY_INACTIVE.
    pub fn new(critical_temp_centi: i32, hysteresis_centi: i32) -> Self {
        Self {
            commanded: RelayState::On,
            guard: ThermalGuard::new(critical_temp_centi, hysteresis_centi),
            fail_safe_trips: 0,
        }
    }

    /// Apply a dispatched command.
    pub fn apply(&mut self, cmd: RelayCommand) -> Option<Transition> {
        let before = self.output();
        self.commanded = cmd.into();
        self.finish(before)
    }

    /// Dead-man expiry: re-enable the relay.
    ///
    /// Only an expiry that finds the relay commanded OFF counts as a trip;
    /// the periodic timer keeps firing while the link is idle and ON.
    pub fn on_deadline_expired(&mut self) -> Option<Transition> {
        let before = self.output();
        if self.commanded == RelayState::Off {
            warn!("FSM: no OFF refresh within deadline, failing safe to ON");
            self.fail_safe_trips = self.fail_safe_trips.wrapping_add(1);
        }
        self.commanded = RelayState::On;
        self.finish(before)
    }

    /// Temperature must be sampled this pass.
    pub fn needs_sampling(&self) -> bool {
        self.commanded == RelayState::Off || self.guard.is_active()
    }

    /// Feed one temperature sample into the thermal guard.
    ///
    /// Returns the latch change (if any) and the resulting output change
    /// (if any).
    pub fn update_temperature(
        &mut self,
        temp_centi: i32,
    ) -> (Option<ThermalTransition>, Option<Transition>) {
        let before = self.output();
        let latch = self.guard.evaluate(temp_centi);
        (latch, self.finish(before))
    }

    /// Value to drive onto the relay pin.
    pub fn output(&self) -> RelayState {
        if self.commanded == RelayState::On || self.guard.is_active() {
            RelayState::On
        } else {
            RelayState::Off
        }
    }

    pub fn commanded(&self) -> RelayState {
        self.commanded
    }

    /// EmergencyFlag.
    pub fn emergency_active(&self) -> bool {
        self.guard.is_active()
    }

    pub fn last_temperature(&self) -> Option<i32> {
        self.guard.last_temperature()
    }

    /// Number of deadline expiries that overrode an OFF command.
    pub fn fail_safe_trips(&self) -> u32 {
        self.fail_safe_trips
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn finish(&self, before: RelayState) -> Option<Transition> {
        let after = self.output();
        if after == before {
            return None;
        }
        info!("FSM transition: {} -> {}", before, after);
        Some(Transition {
            from: before,
            to: after,
        })
    }
}
