//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules for the boiler relay: sentence intake,
//! command dispatch, the fail-safe state machine and the thermal override.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
