//! Hardware timers using ESP-IDF's esp_timer API.
//!
//! - **Deadline**: periodic, period = dead-man window.  Restarted from zero
//!   by every OFF command.  On expiry the callback forces the relay ON
//!   itself, raises the pending-expiry flag and then queues
//!   [`Event::DeadlineExpired`].
//! - **Blink**: one-shot, restarted by every LED blink.  Queues
//!   [`Event::BlinkExpired`].
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call push_event() which only touches atomics.  Both
//! callbacks run in that one task, which is the only producer on the event
//! queue.
//!
//! The main loop polls [`take_deadline_expiry`] before it drives the relay,
//! so an expiry that fires after the queue was drained is never overwritten
//! by a stale OFF.
//!
//! On simulation targets nothing fires on its own; tests drive expiry by
//! pushing events.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::events::{Event, push_event};

/// Raised by the deadline callback, consumed by the main loop.
static DEADLINE_PENDING: AtomicBool = AtomicBool::new(false);

/// Consume the pending-expiry flag.  Returns `true` if the deadline fired
/// since the last call.
pub fn take_deadline_expiry() -> bool {
    DEADLINE_PENDING.swap(false, Ordering::AcqRel)
}

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(target_os = "espidf")]
static mut DEADLINE_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut BLINK_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut DEADLINE_PERIOD_US: u64 = 0;

/// SAFETY: DEADLINE_TIMER is written once in `start_timers()` before any
/// timer callbacks fire.  Only used from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn deadline_timer() -> esp_timer_handle_t { unsafe { DEADLINE_TIMER } }

/// SAFETY: Same invariants as `deadline_timer()`.
#[cfg(target_os = "espidf")]
unsafe fn blink_timer() -> esp_timer_handle_t { unsafe { BLINK_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn deadline_cb(_arg: *mut core::ffi::c_void) {
    hw_init::relay_force_on();
    DEADLINE_PENDING.store(true, Ordering::Release);
    push_event(Event::DeadlineExpired);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn blink_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::BlinkExpired);
}

/// Create both timers and start the deadline countdown.
#[cfg(target_os = "espidf")]
pub fn start_timers(deadline_ms: u32) -> Result<(), EspError> {
    // SAFETY: the handles are written here once at boot from the single
    // main-task context before any callback can fire.  The callbacks only
    // touch the relay register, the pending flag and the atomic event queue.
    unsafe {
        DEADLINE_PERIOD_US = u64::from(deadline_ms) * 1000;

        let deadline_args = esp_timer_create_args_t {
            callback: Some(deadline_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"deadline".as_ptr(),
            skip_unhandled_events: true,
        };
        esp!(esp_timer_create(&deadline_args, &raw mut DEADLINE_TIMER))?;
        esp!(esp_timer_start_periodic(deadline_timer(), DEADLINE_PERIOD_US))?;

        let blink_args = esp_timer_create_args_t {
            callback: Some(blink_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"blink".as_ptr(),
            skip_unhandled_events: true,
        };
        esp!(esp_timer_create(&blink_args, &raw mut BLINK_TIMER))?;
    }
    info!("hw_timer: deadline@{}ms started, blink timer ready", deadline_ms);
    Ok(())
}

/// Restart the dead-man countdown from zero.
#[cfg(target_os = "espidf")]
pub fn restart_deadline() {
    // SAFETY: deadline_timer() contract: main task only.
    unsafe {
        let t = deadline_timer();
        if t.is_null() {
            return;
        }
        esp_timer_stop(t);
        let ret = esp_timer_start_periodic(t, DEADLINE_PERIOD_US);
        if ret != ESP_OK {
            log::error!("hw_timer: deadline restart failed (rc={})", ret);
        }
    }
}

/// (Re)start the one-shot blink timeout.
#[cfg(target_os = "espidf")]
pub fn start_blink(duration_ms: u32) {
    // SAFETY: blink_timer() contract: main task only.
    unsafe {
        let t = blink_timer();
        if t.is_null() {
            return;
        }
        esp_timer_stop(t);
        let ret = esp_timer_start_once(t, u64::from(duration_ms) * 1000);
        if ret != ESP_OK {
            log::warn!("hw_timer: blink start failed (rc={})", ret);
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU32, Ordering};

    pub static DEADLINE_RESTARTS: AtomicU32 = AtomicU32::new(0);
    pub static BLINK_MS: AtomicU32 = AtomicU32::new(0);

    pub fn load(a: &AtomicU32) -> u32 {
        a.load(Ordering::Relaxed)
    }

    pub fn bump(a: &AtomicU32) {
        a.fetch_add(1, Ordering::Relaxed);
    }

    pub fn store(a: &AtomicU32, v: u32) {
        a.store(v, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(deadline_ms: u32) -> Result<(), core::convert::Infallible> {
    log::info!("hw_timer(sim): deadline@{}ms, expiry driven by tests", deadline_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn restart_deadline() {
    sim::bump(&sim::DEADLINE_RESTARTS);
}

#[cfg(not(target_os = "espidf"))]
pub fn start_blink(duration_ms: u32) {
    sim::store(&sim::BLINK_MS, duration_ms);
}

/// Simulate the deadline callback: raise the pending flag and queue the
/// expiry event.
#[cfg(not(target_os = "espidf"))]
pub fn sim_fire_deadline() -> bool {
    DEADLINE_PENDING.store(true, Ordering::Release);
    push_event(Event::DeadlineExpired)
}

/// Simulate the blink callback.
#[cfg(not(target_os = "espidf"))]
pub fn sim_fire_blink() -> bool {
    push_event(Event::BlinkExpired)
}

/// Deadline restarts seen by the simulated timer.
#[cfg(not(target_os = "espidf"))]
pub fn sim_deadline_restarts() -> u32 {
    sim::load(&sim::DEADLINE_RESTARTS)
}

/// Length of the most recent simulated blink.
#[cfg(not(target_os = "espidf"))]
pub fn sim_last_blink_ms() -> u32 {
    sim::load(&sim::BLINK_MS)
}
