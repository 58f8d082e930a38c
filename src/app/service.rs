//! Application service, the hexagonal core.
//!
//! [`BoilerService`] owns every piece of mutable state in the system: the
//! frame receiver, the last good sentence and its ready flag, the relay
//! state machine and the status indicator.  Timer callbacks only queue
//! [`Event`]s and raise the deadline flag; the main loop feeds bytes and
//! events in here one at a time, so no state is shared between execution
//! contexts.
//!
//! ```text
//!  ByteReceived ──▶ ┌───────────────────────────┐ ──▶ ActuatorPort
//!  DeadlineExpired ▶│      BoilerService        │ ──▶ TimerPort
//!  BlinkExpired ──▶ │ Receiver · Validator · FSM│ ──▶ EventSink
//!  tick() ────────▶ └───────────────────────────┘ ◀── SensorPort
//! ```

use log::{debug, info};

use crate::config::BoilerConfig;
use crate::error::ConfigError;
use crate::events::Event;
use crate::fsm::{RelayFsm, RelayState, Transition};
use crate::indicator::{Led, StatusIndicator};
use crate::protocol::{FrameReceiver, LastGoodSentence, Publish, RelayCommand, extract_field};
use crate::safety::ThermalTransition;

use super::events::{AppEvent, LinkStats, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort, TimerPort};

// ───────────────────────────────────────────────────────────────
// BoilerService
// ───────────────────────────────────────────────────────────────

pub struct BoilerService {
    config: BoilerConfig,
    receiver: FrameReceiver,
    last_good: LastGoodSentence,
    fsm: RelayFsm,
    indicator: StatusIndicator,
    stats: LinkStats,
    tick_count: u64,
}

impl BoilerService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: BoilerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let last_good = LastGoodSentence::new(config.sentence_name.as_bytes());
        let fsm = RelayFsm::new(config.critical_temp_centi, config.hysteresis_centi);

        Ok(Self {
            config,
            receiver: FrameReceiver::new(),
            last_good,
            fsm,
            indicator: StatusIndicator::new(),
            stats: LinkStats::default(),
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Power-on self test: relay ON, deadline running, both LEDs blink.
    pub fn start(&mut self, hw: &mut (impl ActuatorPort + TimerPort), sink: &mut impl EventSink) {
        let output = self.fsm.output();
        hw.set_relay(output);
        hw.restart_deadline();
        for led in Led::ALL {
            self.indicator.blink(led, self.config.post_blink_ms, hw);
        }
        sink.emit(&AppEvent::Started(output));
        info!(
            "BoilerService started: relay {} | expecting {}",
            output, self.config.sentence_name
        );
    }

    // ── Event handlers (run to completion, never re-entered) ──

    pub fn handle_event(
        &mut self,
        event: Event,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::ByteReceived(byte) => self.on_byte_received(byte, hw, sink),
            Event::DeadlineExpired => self.on_deadline_expired(hw, sink),
            Event::BlinkExpired => self.on_blink_expired(hw),
        }
    }

    /// Feed one byte from the RF link.
    ///
    /// A completed frame is validated immediately.  Every completed frame
    /// blinks the activity LED; a rejected one also blinks the error LED.
    pub fn on_byte_received(
        &mut self,
        byte: u8,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        let Some(frame) = self.receiver.push(byte) else {
            return;
        };

        match self.last_good.validate_and_publish(frame) {
            Ok(Publish::Accepted) => {
                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                sink.emit(&AppEvent::SentenceAccepted);
            }
            Ok(Publish::Ignored) => {
                self.stats.ignored = self.stats.ignored.wrapping_add(1);
                debug!("service: ignored foreign sentence");
            }
            Err(e) => {
                self.stats.rejected = self.stats.rejected.wrapping_add(1);
                self.indicator.blink(Led::Error, self.config.error_blink_ms, hw);
                sink.emit(&AppEvent::SentenceRejected(e));
            }
        }
        self.indicator
            .blink(Led::Activity, self.config.comm_blink_ms, hw);
    }

    /// Dead-man countdown elapsed.
    ///
    /// The expiry may already have been handled by [`tick`](Self::tick)
    /// through the pending flag; a second pass is then a no-op.
    pub fn on_deadline_expired(
        &mut self,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        let _ = hw.take_deadline_expiry();
        self.fail_safe(hw, sink);
    }

    /// Shared blink timeout elapsed.
    ///
    /// The red LED stays lit while the thermal override is latched.
    pub fn on_blink_expired(&mut self, hw: &mut impl ActuatorPort) {
        self.indicator.on_blink_expired(hw);
        if self.fsm.emergency_active() {
            self.indicator.set(Led::Error, true, hw);
        }
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// One main-loop pass: pending deadline → dispatch → sample → drive relay.
    pub fn tick(
        &mut self,
        hw: &mut (impl ActuatorPort + TimerPort + SensorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. A deadline that fired since the queue was drained wins.
        if hw.take_deadline_expiry() {
            self.fail_safe(hw, sink);
        }

        // 2. Consume the ready flag and dispatch the published sentence.
        self.dispatch_pending(hw, sink);

        // 3. Thermal override, only while commanded OFF or already latched.
        if self.fsm.needs_sampling() {
            let temp = hw.read_temperature();
            let (latch, transition) = self.fsm.update_temperature(temp);
            match latch {
                Some(ThermalTransition::Entered) => {
                    self.indicator.set(Led::Error, true, hw);
                    sink.emit(&AppEvent::EmergencyEntered { temp_centi: temp });
                }
                Some(ThermalTransition::Cleared) => {
                    self.indicator.set(Led::Error, false, hw);
                    sink.emit(&AppEvent::EmergencyCleared { temp_centi: temp });
                }
                None => {}
            }
            Self::emit_transition(transition, sink);
        }

        // 4. Re-assert the output every pass, re-checking the deadline
        //    right before the write.
        if hw.take_deadline_expiry() {
            self.fail_safe(hw, sink);
        }
        hw.set_relay(self.fsm.output());
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            relay: self.fsm.output(),
            commanded: self.fsm.commanded(),
            emergency: self.fsm.emergency_active(),
            temperature_centi: self.fsm.last_temperature(),
            link: self.stats(),
            uptime_ticks: self.tick_count,
        }
    }

    pub fn stats(&self) -> LinkStats {
        LinkStats {
            overflows: self.receiver.overflows(),
            fail_safe_trips: self.fsm.fail_safe_trips(),
            ..self.stats
        }
    }

    /// Value currently driven onto the relay.
    pub fn relay_output(&self) -> RelayState {
        self.fsm.output()
    }

    /// Last commanded (or fail-safe) relay state, ignoring the override.
    pub fn commanded(&self) -> RelayState {
        self.fsm.commanded()
    }

    pub fn emergency_active(&self) -> bool {
        self.fsm.emergency_active()
    }

    /// Currently published sentence (the sentinel when nothing is pending).
    pub fn last_good_sentence(&self) -> &[u8] {
        self.last_good.as_bytes()
    }

    /// A frame was processed and the main loop has not consumed it yet.
    pub fn frame_ready(&self) -> bool {
        self.last_good.is_ready()
    }

    pub fn led_lit(&self, led: Led) -> bool {
        self.indicator.is_lit(led)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &BoilerConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch_pending(&mut self, hw: &mut (impl ActuatorPort + TimerPort), sink: &mut impl EventSink) {
        let Some(sentence) = self.last_good.take_ready() else {
            return;
        };
        let field = extract_field(sentence, usize::from(self.config.command_field));
        let command = RelayCommand::from_field(field);
        if command.is_none() {
            debug!("service: no command in {:?}", core::str::from_utf8(sentence));
        }
        self.last_good.reset();

        if let Some(command) = command {
            self.apply_command(command, hw, sink);
        }
    }

    fn apply_command(
        &mut self,
        command: RelayCommand,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        let transition = self.fsm.apply(command);
        if command == RelayCommand::Off {
            hw.restart_deadline();
        }
        hw.set_relay(self.fsm.output());
        sink.emit(&AppEvent::CommandApplied(command));
        Self::emit_transition(transition, sink);
    }

    fn fail_safe(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let tripped = self.fsm.commanded() == RelayState::Off;
        let transition = self.fsm.on_deadline_expired();
        hw.set_relay(self.fsm.output());
        if tripped {
            sink.emit(&AppEvent::FailSafeTripped);
        }
        Self::emit_transition(transition, sink);
    }

    fn emit_transition(transition: Option<Transition>, sink: &mut impl EventSink) {
        if let Some(Transition { from, to }) = transition {
            sink.emit(&AppEvent::RelayChanged { from, to });
        }
    }
}
