use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use crate::game::{Deferred, Scheduler, TimerId};

use super::app::with_session;
use super::state::{TimerSources, UiState};

/// Runs deferred game work on the glib main loop.
pub(super) struct GlibScheduler<'a> {
    pub timers: &'a mut TimerSources,
    pub state: Weak<RefCell<UiState>>,
}

impl Scheduler for GlibScheduler<'_> {
    fn schedule_once(&mut self, delay: Duration, event: Deferred) -> TimerId {
        let id = self.timers.allocate();
        let state_weak = self.state.clone();
        let handle = glib::timeout_add_local_once(delay, move || {
            let Some(state) = state_weak.upgrade() else {
                return;
            };
            // The source is gone once this runs; drop it before the game can cancel it.
            state.borrow_mut().timers.sources.remove(&id);
            with_session(&state, |session, surface, scheduler| {
                session.on_deferred(id, event, surface, scheduler);
            });
        });
        self.timers.sources.insert(id, handle);
        id
    }

    fn schedule_repeating(&mut self, interval: Duration, event: Deferred) -> TimerId {
        let id = self.timers.allocate();
        let state_weak = self.state.clone();
        let handle = glib::timeout_add_local(interval, move || {
            let Some(state) = state_weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            with_session(&state, |session, surface, scheduler| {
                session.on_deferred(id, event, surface, scheduler);
            });
            glib::ControlFlow::Continue
        });
        self.timers.sources.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.timers.sources.remove(&id) {
            handle.remove();
        }
    }
}
