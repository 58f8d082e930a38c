//! Mock hardware adapter for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real GPIO registers, and simulates the two
//! hardware timers against a virtual millisecond clock.

use std::collections::VecDeque;

use boiler::app::events::AppEvent;
use boiler::app::ports::{ActuatorPort, ByteSource, EventSink, SensorPort, TimerPort};
use boiler::app::service::BoilerService;
use boiler::config::BoilerConfig;
use boiler::events::Event;
use boiler::fsm::RelayState;
use boiler::indicator::Led;

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    SetRelay(RelayState),
    SetLed { led: Led, on: bool },
    RestartDeadline,
    StartBlink { ms: u32 },
    ReadTemperature,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Value returned by the next temperature read (1/100 °C).
    pub temperature_centi: i32,
    deadline_period_ms: u32,
    deadline_remaining_ms: Option<u32>,
    deadline_pending: bool,
    blink_remaining_ms: Option<u32>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(deadline_period_ms: u32) -> Self {
        Self {
            calls: Vec::new(),
            temperature_centi: 5000,
            deadline_period_ms,
            deadline_remaining_ms: None,
            deadline_pending: false,
            blink_remaining_ms: None,
        }
    }

    /// Advance the virtual clock and return the timer expiries that fired,
    /// in the order the callbacks would have queued them.
    ///
    /// The deadline timer is periodic; the blink timer is one-shot.  A
    /// deadline expiry also raises the pending flag, as the callback does.
    pub fn advance(&mut self, mut ms: u32) -> Vec<Event> {
        let mut fired = Vec::new();
        while ms > 0 {
            let step = [self.deadline_remaining_ms, self.blink_remaining_ms, Some(ms)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(ms)
                .max(1);
            ms -= step.min(ms);

            if let Some(r) = self.blink_remaining_ms.as_mut() {
                *r = r.saturating_sub(step);
                if *r == 0 {
                    self.blink_remaining_ms = None;
                    fired.push(Event::BlinkExpired);
                }
            }
            if let Some(r) = self.deadline_remaining_ms.as_mut() {
                *r = r.saturating_sub(step);
                if *r == 0 {
                    self.deadline_remaining_ms = Some(self.deadline_period_ms);
                    self.deadline_pending = true;
                    fired.push(Event::DeadlineExpired);
                }
            }
        }
        fired
    }

    /// Last value written to the relay.
    pub fn relay(&self) -> Option<RelayState> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::SetRelay(s) => Some(*s),
            _ => None,
        })
    }

    /// Last value written to `led` (false if never written).
    pub fn led(&self, led: Led) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::SetLed { led: l, on } if *l == led => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, call: &HwCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn deadline_remaining_ms(&self) -> Option<u32> {
        self.deadline_remaining_ms
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, state: RelayState) {
        self.calls.push(HwCall::SetRelay(state));
    }

    fn set_led(&mut self, led: Led, on: bool) {
        self.calls.push(HwCall::SetLed { led, on });
    }
}

impl TimerPort for MockHardware {
    fn restart_deadline(&mut self) {
        self.calls.push(HwCall::RestartDeadline);
        self.deadline_remaining_ms = Some(self.deadline_period_ms);
    }

    fn start_blink(&mut self, duration_ms: u32) {
        self.calls.push(HwCall::StartBlink { ms: duration_ms });
        self.blink_remaining_ms = Some(duration_ms);
    }

    fn take_deadline_expiry(&mut self) -> bool {
        std::mem::take(&mut self.deadline_pending)
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> i32 {
        self.calls.push(HwCall::ReadTemperature);
        self.temperature_centi
    }
}

// ── ScriptedLink ──────────────────────────────────────────────

/// Byte source that plays back queued bytes.
#[derive(Default)]
pub struct ScriptedLink {
    pending: VecDeque<u8>,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn send(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }
}

impl ByteSource for ScriptedLink {
    fn next_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started service wired to mocks.
pub struct Rig {
    pub app: BoilerService,
    pub hw: MockHardware,
    pub sink: LogSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: BoilerConfig) -> Self {
        let mut hw = MockHardware::new(config.deadline_timeout_ms);
        let mut app = BoilerService::new(config).expect("valid config");
        let mut sink = LogSink::new();
        app.start(&mut hw, &mut sink);
        Self { app, hw, sink }
    }

    pub fn with_name(name: &str) -> Self {
        Self::new(BoilerConfig::with_sentence_name(name).expect("valid name"))
    }

    /// Feed raw bytes as if they came off the RF UART.
    pub fn receive(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.app
                .handle_event(Event::ByteReceived(b), &mut self.hw, &mut self.sink);
        }
    }

    /// One main-loop pass.
    pub fn tick(&mut self) {
        self.app.tick(&mut self.hw, &mut self.sink);
    }

    /// Advance virtual time, delivering timer expiries to the service.
    pub fn advance(&mut self, ms: u32) {
        for event in self.hw.advance(ms) {
            self.app.handle_event(event, &mut self.hw, &mut self.sink);
        }
    }

    pub fn sentence(name: &str, command: &str) -> Vec<u8> {
        boiler::protocol::encode_sentence(name, &[command])
            .expect("fits in a frame")
            .as_bytes()
            .to_vec()
    }
}
