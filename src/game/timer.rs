use std::time::Duration;

use super::state::GameState;
use super::surface::{Deferred, Region, Scheduler, Surface};

pub const COMPLETION_MESSAGE: &str = "Congratulations! You matched all the cards!";

pub fn format_mm_ss(total_secs: u32) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

pub fn flips_label(flips: u32) -> String {
    format!("Flips: {flips}")
}

pub(crate) fn update_timer_display(st: &GameState, surface: &mut dyn Surface) {
    surface.set_text(Region::Timer, &format_mm_ss(st.elapsed_seconds));
}

pub(crate) fn start_timer(
    st: &mut GameState,
    tick: Duration,
    surface: &mut dyn Surface,
    scheduler: &mut dyn Scheduler,
) {
    if st.timer_started {
        return;
    }
    st.timer_started = true;
    surface.set_visible(Region::Timer, true);
    let handle = scheduler.schedule_repeating(
        tick,
        Deferred::Tick {
            session: st.session_id,
        },
    );
    st.timer_handle = Some(handle);
}

/// Cancels the tick but leaves `timer_started` set, so a finished board keeps its time.
pub(crate) fn stop_timer(st: &mut GameState, scheduler: &mut dyn Scheduler) {
    if let Some(handle) = st.timer_handle.take() {
        scheduler.cancel(handle);
    }
}

pub(crate) fn reset_timer(
    st: &mut GameState,
    surface: &mut dyn Surface,
    scheduler: &mut dyn Scheduler,
) {
    stop_timer(st, scheduler);
    st.elapsed_seconds = 0;
    update_timer_display(st, surface);
    st.timer_started = false;
}

pub(crate) fn tick(st: &mut GameState, surface: &mut dyn Surface) {
    st.elapsed_seconds = st.elapsed_seconds.saturating_add(1);
    tracing::trace!(elapsed = st.elapsed_seconds, "tick");
    update_timer_display(st, surface);
}

/// Lines shown once every pair is matched.
pub fn completion_lines(elapsed_seconds: u32, flips: u32) -> Vec<String> {
    let seconds_label = if elapsed_seconds == 1 {
        "second"
    } else {
        "seconds"
    };
    vec![
        COMPLETION_MESSAGE.to_string(),
        format!("Time: {} {}", format_mm_ss(elapsed_seconds), seconds_label),
        flips_label(flips),
    ]
}
