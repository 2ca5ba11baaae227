//! In-memory [`Surface`] and [`Scheduler`] with a manual millisecond clock.
//!
//! Drives a [`Session`] without a display, the way the desktop shell drives it
//! from glib callbacks.

use std::collections::HashMap;
use std::time::Duration;

use super::config::GridSize;
use super::error::GameError;
use super::session::{ClickOutcome, Session};
use super::state::Card;
use super::surface::{CardHandle, Deferred, Region, Scheduler, Surface, TimerId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub handle: CardHandle,
    pub name: String,
    pub image_source: String,
    pub classes: Vec<&'static str>,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    texts: HashMap<Region, String>,
    visible: HashMap<Region, bool>,
    pub message: Vec<String>,
    pub grid: Option<GridSize>,
    pub cards: Vec<CardView>,
}

impl HeadlessSurface {
    pub fn text(&self, region: Region) -> &str {
        self.texts.get(&region).map(String::as_str).unwrap_or("")
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.get(&region).copied().unwrap_or(false)
    }

    pub fn card_classes(&self, index: usize) -> &[&'static str] {
        self.cards
            .get(index)
            .map(|view| view.classes.as_slice())
            .unwrap_or(&[])
    }
}

impl Surface for HeadlessSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.texts.insert(region, text.to_string());
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        self.visible.insert(region, visible);
    }

    fn show_message(&mut self, lines: &[String]) {
        self.message = lines.to_vec();
    }

    fn clear_grid(&mut self) {
        self.cards.clear();
    }

    fn layout_grid(&mut self, grid: GridSize) {
        self.grid = Some(grid);
    }

    fn add_card(&mut self, handle: CardHandle, card: &Card) {
        self.cards.push(CardView {
            handle,
            name: card.name().to_string(),
            image_source: card.entry.image_source.clone(),
            classes: card.css_classes(),
        });
    }

    fn render_card(&mut self, index: usize, card: &Card) {
        if let Some(view) = self.cards.get_mut(index) {
            view.classes = card.css_classes();
        }
    }
}

#[derive(Debug)]
struct Entry {
    id: TimerId,
    due_ms: u64,
    interval_ms: Option<u64>,
    event: Deferred,
}

#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry>,
}

impl ManualScheduler {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn has_event(&self, matches: impl Fn(&Deferred) -> bool) -> bool {
        self.entries.iter().any(|entry| matches(&entry.event))
    }

    fn push(&mut self, delay: Duration, interval_ms: Option<u64>, event: Deferred) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(Entry {
            id,
            due_ms: self.now_ms + delay.as_millis() as u64,
            interval_ms,
            event,
        });
        id
    }

    /// Pops the earliest entry due at or before `until_ms`, re-arming repeating ones.
    fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, Deferred)> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= until_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.id))
            .map(|(pos, _)| pos)?;

        let entry = &mut self.entries[pos];
        self.now_ms = entry.due_ms;
        let fired = (entry.id, entry.event);
        match entry.interval_ms {
            Some(interval) => entry.due_ms += interval.max(1),
            None => {
                self.entries.remove(pos);
            }
        }
        Some(fired)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay: Duration, event: Deferred) -> TimerId {
        self.push(delay, None, event)
    }

    fn schedule_repeating(&mut self, interval: Duration, event: Deferred) -> TimerId {
        self.push(interval, Some(interval.as_millis() as u64), event)
    }

    fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|entry| entry.id != id);
    }
}

pub struct Harness {
    pub session: Session,
    pub surface: HeadlessSurface,
    pub scheduler: ManualScheduler,
}

impl Harness {
    pub fn new(session: Session) -> Self {
        Harness {
            session,
            surface: HeadlessSurface::default(),
            scheduler: ManualScheduler::default(),
        }
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        self.session.start_game(&mut self.surface, &mut self.scheduler)
    }

    pub fn select(&mut self, value: &str) -> Result<GridSize, GameError> {
        self.session.select_grid_size(value, &mut self.surface)
    }

    /// Clicks a card of the current board.
    pub fn click(&mut self, index: usize) -> ClickOutcome {
        let handle = CardHandle {
            session: self.session.session_id(),
            index,
        };
        self.click_handle(handle)
    }

    pub fn click_handle(&mut self, handle: CardHandle) -> ClickOutcome {
        self.session.handle_card_click(handle, &mut self.surface, &mut self.scheduler)
    }

    /// Moves the clock forward, firing every callback that comes due in order.
    pub fn advance(&mut self, ms: u64) {
        let until_ms = self.scheduler.now_ms + ms;
        while let Some((id, event)) = self.scheduler.pop_due(until_ms) {
            self.session.on_deferred(id, event, &mut self.surface, &mut self.scheduler);
        }
        self.scheduler.now_ms = until_ms;
    }

    pub fn indices_of(&self, name: &str) -> Vec<usize> {
        self.session
            .cards()
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| (card.name() == name).then_some(idx))
            .collect()
    }

    /// Index of one card from each of two different pairs.
    pub fn mismatched_pair(&self) -> (usize, usize) {
        let cards = self.session.cards();
        let first = 0;
        let second = cards
            .iter()
            .position(|card| card.name() != cards[first].name())
            .unwrap_or(first);
        (first, second)
    }
}
