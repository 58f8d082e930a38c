//! RF link handling: framing, foreign traffic, diagnostics and the event
//! queue path the firmware loop uses.

use boiler::adapters::log_sink::LogEventSink;
use boiler::app::events::AppEvent;
use boiler::app::ports::{ByteSource, EventSink};
use boiler::config::BoilerConfig;
use boiler::events::{Event, EventQueue};
use boiler::fsm::RelayState;
use boiler::indicator::Led;

use crate::mock_hw::{HwCall, Rig, ScriptedLink};

#[test]
fn foreign_sentence_is_ignored_silently() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.advance(500);
    rig.sink.clear();

    rig.receive(b"$GPGGA,123*4A\r\n");
    rig.tick();

    let stats = rig.app.stats();
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.rejected, 0);
    assert!(rig.sink.events.is_empty());
    assert!(!rig.hw.led(Led::Error));
    // Activity blink still fires for every completed frame.
    assert!(rig.hw.led(Led::Activity));
}

#[test]
fn line_without_start_delimiter_never_reaches_validator() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.receive(b"SHBCC,OFF*3A\r\n");
    assert!(!rig.app.frame_ready());
    rig.tick();
    assert_eq!(rig.app.relay_output(), RelayState::On);

    let stats = rig.app.stats();
    assert_eq!(stats.accepted + stats.rejected + stats.ignored, 0);
}

#[test]
fn noise_before_start_delimiter_is_discarded() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.receive(b"\x00\xFF$SH$SHBCC,OFF*3A\r\n");
    rig.tick();
    assert_eq!(rig.app.relay_output(), RelayState::Off);
}

#[test]
fn lowercase_checksum_is_accepted() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.receive(b"$SHBCC,OFF*3a\r\n");
    rig.tick();
    assert_eq!(rig.app.relay_output(), RelayState::Off);
}

#[test]
fn oversized_frame_wraps_and_is_counted() {
    let mut rig = Rig::new(BoilerConfig::default());
    let mut junk = b"$SHBCC,".to_vec();
    junk.extend(std::iter::repeat_n(b'X', 200));
    junk.extend_from_slice(b"\r\n");
    rig.receive(&junk);
    rig.tick();

    assert!(rig.app.stats().overflows >= 2);
    assert_eq!(rig.app.relay_output(), RelayState::On);
}

#[test]
fn command_is_dispatched_exactly_once() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.receive(b"$SHBCC,OFF*3A\r\n");
    rig.tick();
    assert_eq!(rig.hw.count(&HwCall::RestartDeadline), 2);

    for _ in 0..5 {
        rig.tick();
    }
    assert_eq!(rig.hw.count(&HwCall::RestartDeadline), 2);
    assert_eq!(rig.app.last_good_sentence(), b"SHBCC");
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::CommandApplied(_))),
        1
    );
}

#[test]
fn latest_sentence_wins_between_ticks() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.receive(b"$SHBCC,OFF*3A\r\n$SHBCC,ON*74\r\n");
    rig.tick();
    assert_eq!(rig.app.relay_output(), RelayState::On);
    assert_eq!(rig.app.stats().accepted, 2);
}

#[test]
fn queued_bytes_and_timer_events_are_processed_in_order() {
    let mut rig = Rig::new(BoilerConfig::default());
    let queue = EventQueue::new();
    let mut link = ScriptedLink::default();
    link.send(b"$SHBCC,OFF*3A\r\n");

    while let Some(b) = link.next_byte() {
        assert!(queue.push(Event::ByteReceived(b)));
    }
    queue.drain(|e| rig.app.handle_event(e, &mut rig.hw, &mut rig.sink));
    rig.tick();
    assert_eq!(rig.app.relay_output(), RelayState::Off);

    assert!(queue.push(Event::DeadlineExpired));
    assert!(queue.push(Event::BlinkExpired));
    queue.drain(|e| rig.app.handle_event(e, &mut rig.hw, &mut rig.sink));
    assert_eq!(rig.app.relay_output(), RelayState::On);
    assert!(!rig.hw.led(Led::Activity));
}

#[test]
fn telemetry_reflects_link_and_relay_state() {
    let mut rig = Rig::new(BoilerConfig::default());
    rig.hw.temperature_centi = 2000;
    rig.receive(b"$SHBCC,OFF*3A\r\n$SHBCC,OFF*3B\r\n$GPGGA,1*00\r\n");
    rig.tick();

    let t = rig.app.build_telemetry();
    assert_eq!(t.commanded, RelayState::Off);
    assert_eq!(t.relay, RelayState::On);
    assert!(t.emergency);
    assert_eq!(t.temperature_centi, Some(2000));
    assert_eq!(t.link.accepted, 1);
    assert_eq!(t.link.rejected, 1);
    assert_eq!(t.link.ignored, 1);
    assert_eq!(t.uptime_ticks, 1);

    // The serial sink renders every event kind without panicking.
    let mut log = LogEventSink::new();
    log.emit(&AppEvent::Telemetry(t));
    for e in &rig.sink.events {
        log.emit(e);
    }
}
