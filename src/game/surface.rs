//! Capabilities the game core needs from its host.
//!
//! The core never touches widgets or the event loop directly. A host renders
//! through [`Surface`] and turns [`Deferred`] values handed to its
//! [`Scheduler`] back into [`Session::on_deferred`](super::session::Session::on_deferred)
//! calls once they fire.

use std::time::Duration;

use super::config::GridSize;
use super::state::Card;

/// Fixed UI regions the game writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    StartButton,
    ResetButton,
    Message,
    Grid,
    SizeSelector,
    Timer,
    FlipCount,
}

/// Identifies one card element of one session; clicks carry it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CardHandle {
    pub session: u64,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Work scheduled for later. Each value is tagged with the session that queued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    Tick { session: u64 },
    FlipBack { session: u64, cards: [usize; 2] },
    EndMessage { session: u64 },
}

impl Deferred {
    pub fn session(self) -> u64 {
        match self {
            Deferred::Tick { session }
            | Deferred::FlipBack { session, .. }
            | Deferred::EndMessage { session } => session,
        }
    }
}

pub trait Surface {
    fn set_text(&mut self, region: Region, text: &str);
    fn set_visible(&mut self, region: Region, visible: bool);
    /// Replaces the message area with one line per entry.
    fn show_message(&mut self, lines: &[String]);
    /// Detaches every card element along with its click binding.
    fn clear_grid(&mut self);
    fn layout_grid(&mut self, grid: GridSize);
    fn add_card(&mut self, handle: CardHandle, card: &Card);
    fn render_card(&mut self, index: usize, card: &Card);
}

pub trait Scheduler {
    fn schedule_once(&mut self, delay: Duration, event: Deferred) -> TimerId;
    fn schedule_repeating(&mut self, interval: Duration, event: Deferred) -> TimerId;
    /// Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}
