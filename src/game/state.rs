use super::catalog::CatalogEntry;
use super::surface::TimerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Hidden,
    Flipped,
    Matched,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub entry: CatalogEntry,
    pub status: CardStatus,
    /// Face-up and not clickable until the pair resolves. Matched cards keep it.
    pub locked: bool,
}

impl Card {
    pub fn new(entry: CatalogEntry) -> Self {
        Card {
            entry,
            status: CardStatus::Hidden,
            locked: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn is_face_up(&self) -> bool {
        self.status != CardStatus::Hidden
    }

    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::with_capacity(2);
        match self.status {
            CardStatus::Hidden => {}
            CardStatus::Flipped => classes.push("flipped"),
            CardStatus::Matched => classes.push("matched"),
        }
        if self.locked {
            classes.push("locked");
        }
        classes
    }
}

/// Counters and flags for one page session, reset on every new game.
#[derive(Debug, Default)]
pub struct GameState {
    pub board_locked: bool,
    /// Cards, not pairs.
    pub matched_count: usize,
    pub elapsed_seconds: u32,
    pub timer_handle: Option<TimerId>,
    pub timer_started: bool,
    pub flip_count: u32,
    pub session_id: u64,
    /// Flip-back and end-message callbacks still waiting to fire.
    pub pending: Vec<TimerId>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_counters(&mut self) {
        self.session_id = self.session_id.wrapping_add(1);
        self.board_locked = false;
        self.matched_count = 0;
        self.timer_started = false;
        self.flip_count = 0;
    }

    pub fn forget_pending(&mut self, id: TimerId) {
        self.pending.retain(|pending| *pending != id);
    }
}
