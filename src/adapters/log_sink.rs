//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Renders 1/100 °C as `-1.50°C`.
struct Centi(i32);

impl core::fmt::Display for Centi {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}\u{00b0}C", abs / 100, abs % 100)
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | relay={} cmd={} | emergency={} | T={} | \
                     ok={} bad={} other={} ovf={} | failsafe={} | ticks={}",
                    t.relay,
                    t.commanded,
                    t.emergency,
                    match t.temperature_centi {
                        Some(c) => Centi(c).to_string(),
                        None => "n/a".into(),
                    },
                    t.link.accepted,
                    t.link.rejected,
                    t.link.ignored,
                    t.link.overflows,
                    t.link.fail_safe_trips,
                    t.uptime_ticks,
                );
            }
            AppEvent::Started(relay) => {
                info!("START | relay={}", relay);
            }
            AppEvent::SentenceAccepted => {
                debug!("LINK | sentence accepted");
            }
            AppEvent::SentenceRejected(e) => {
                warn!("LINK | sentence rejected: {}", e);
            }
            AppEvent::CommandApplied(cmd) => {
                info!("CMD | {}", cmd);
            }
            AppEvent::RelayChanged { from, to } => {
                info!("RELAY | {} -> {}", from, to);
            }
            AppEvent::FailSafeTripped => {
                warn!("FAILSAFE | deadline expired, relay forced ON");
            }
            AppEvent::EmergencyEntered { temp_centi } => {
                error!("THERMAL | override set at {}", Centi(*temp_centi));
            }
            AppEvent::EmergencyCleared { temp_centi } => {
                info!("THERMAL | override cleared at {}", Centi(*temp_centi));
            }
        }
    }
}
