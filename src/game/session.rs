use rand::SeedableRng;
use rand::rngs::StdRng;

use super::board::build_deck;
use super::catalog::Catalog;
use super::config::{GridSize, Timings};
use super::error::GameError;
use super::state::{Card, CardStatus, GameState};
use super::surface::{CardHandle, Deferred, Region, Scheduler, Surface, TimerId};
use super::timer::{self, completion_lines, flips_label};

pub const START_LABEL: &str = "Start Game";
pub const RESTART_LABEL: &str = "Restart Game";

/// What a click did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Stale card, locked board, or a card that is already face-up.
    Ignored,
    /// First card of a pair turned face-up.
    Flipped,
    Matched,
    /// Second card differs; both flip back after the configured delay.
    Mismatched,
    /// Last pair matched; the end message is scheduled.
    Completed,
}

/// Owns the board and its counters for the lifetime of the page.
pub struct Session {
    catalog: Catalog,
    timings: Timings,
    grid: GridSize,
    state: GameState,
    cards: Vec<Card>,
    rng: StdRng,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, rng: StdRng) -> Self {
        Session {
            catalog,
            timings: Timings::default(),
            grid: GridSize::default(),
            state: GameState::new(),
            cards: Vec::new(),
            rng,
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn session_id(&self) -> u64 {
        self.state.session_id
    }

    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.state.matched_count == self.cards.len()
    }

    /// Stores a new `RxC` selection and re-arms the start control without rebuilding.
    pub fn select_grid_size(
        &mut self,
        value: &str,
        surface: &mut dyn Surface,
    ) -> Result<GridSize, GameError> {
        let grid: GridSize = value.parse()?;
        self.grid = grid;
        surface.set_text(Region::StartButton, START_LABEL);
        surface.set_visible(Region::StartButton, true);
        tracing::debug!(%grid, "grid size selected");
        Ok(grid)
    }

    pub fn start_game(
        &mut self,
        surface: &mut dyn Surface,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), GameError> {
        let cards = build_deck(&self.catalog, self.grid, &mut self.rng)?;

        self.cancel_pending(scheduler);
        self.state.reset_counters();

        surface.set_visible(Region::Timer, false);
        surface.set_visible(Region::FlipCount, true);
        surface.set_text(Region::FlipCount, &flips_label(0));

        self.attach_cards(cards, surface, scheduler);
        surface.set_visible(Region::StartButton, false);

        tracing::info!(
            session = self.state.session_id,
            grid = %self.grid,
            cards = self.cards.len(),
            "game started"
        );
        Ok(())
    }

    fn attach_cards(
        &mut self,
        cards: Vec<Card>,
        surface: &mut dyn Surface,
        scheduler: &mut dyn Scheduler,
    ) {
        surface.clear_grid();
        surface.show_message(&[]);
        surface.layout_grid(self.grid);
        timer::reset_timer(&mut self.state, surface, scheduler);

        self.cards = cards;
        let session = self.state.session_id;
        for (index, card) in self.cards.iter().enumerate() {
            surface.add_card(CardHandle { session, index }, card);
        }

        surface.set_visible(Region::Grid, true);
        surface.set_visible(Region::Message, false);
    }

    pub fn handle_card_click(
        &mut self,
        handle: CardHandle,
        surface: &mut dyn Surface,
        scheduler: &mut dyn Scheduler,
    ) -> ClickOutcome {
        if handle.session != self.state.session_id || handle.index >= self.cards.len() {
            tracing::debug!(?handle, "ignoring click on detached card");
            return ClickOutcome::Ignored;
        }

        if !self.state.timer_started {
            timer::start_timer(&mut self.state, self.timings.tick, surface, scheduler);
        }

        if self.state.board_locked {
            return ClickOutcome::Ignored;
        }

        let index = handle.index;
        {
            let card = &self.cards[index];
            if card.locked || card.status == CardStatus::Matched {
                return ClickOutcome::Ignored;
            }
        }

        let card = &mut self.cards[index];
        card.status = CardStatus::Flipped;
        card.locked = true;
        surface.render_card(index, card);
        self.state.flip_count = self.state.flip_count.saturating_add(1);
        surface.set_text(Region::FlipCount, &flips_label(self.state.flip_count));

        if self.state.matched_count == 0 {
            surface.set_text(Region::StartButton, RESTART_LABEL);
            surface.set_visible(Region::StartButton, true);
        }

        let outcome = self.match_cards(surface, scheduler);
        tracing::debug!(index, ?outcome, flips = self.state.flip_count, "card clicked");
        outcome
    }

    fn match_cards(
        &mut self,
        surface: &mut dyn Surface,
        scheduler: &mut dyn Scheduler,
    ) -> ClickOutcome {
        let flipped: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| (card.status == CardStatus::Flipped).then_some(idx))
            .collect();

        let &[first, second] = flipped.as_slice() else {
            return ClickOutcome::Flipped;
        };

        self.state.board_locked = true;
        if self.cards[first].name() == self.cards[second].name() {
            self.handle_match([first, second], surface, scheduler)
        } else {
            let id = scheduler.schedule_once(
                self.timings.flip_back,
                Deferred::FlipBack {
                    session: self.state.session_id,
                    cards: [first, second],
                },
            );
            self.state.pending.push(id);
            ClickOutcome::Mismatched
        }
    }

    fn handle_match(
        &mut self,
        pair: [usize; 2],
        surface: &mut dyn Surface,
        scheduler: &mut dyn Scheduler,
    ) -> ClickOutcome {
        for idx in pair {
            let card = &mut self.cards[idx];
            card.status = CardStatus::Matched;
            surface.render_card(idx, card);
        }
        self.state.matched_count += 2;
        self.state.board_locked = false;

        if self.state.matched_count != self.cards.len() {
            return ClickOutcome::Matched;
        }

        timer::stop_timer(&mut self.state, scheduler);
        let id = scheduler.schedule_once(
            self.timings.end_message,
            Deferred::EndMessage {
                session: self.state.session_id,
            },
        );
        self.state.pending.push(id);
        ClickOutcome::Completed
    }

    /// Delivers a fired callback. Events queued by an earlier game are dropped.
    pub fn on_deferred(
        &mut self,
        id: TimerId,
        event: Deferred,
        surface: &mut dyn Surface,
        scheduler: &mut dyn Scheduler,
    ) {
        if event.session() != self.state.session_id {
            tracing::debug!(?event, "dropping stale callback");
            scheduler.cancel(id);
            return;
        }

        match event {
            Deferred::Tick { .. } => {
                if self.state.timer_handle == Some(id) {
                    timer::tick(&mut self.state, surface);
                }
            }
            Deferred::FlipBack { cards, .. } => {
                self.state.forget_pending(id);
                for idx in cards {
                    if let Some(card) = self.cards.get_mut(idx) {
                        card.status = CardStatus::Hidden;
                        card.locked = false;
                        surface.render_card(idx, card);
                    }
                }
                self.state.board_locked = false;
            }
            Deferred::EndMessage { .. } => {
                self.state.forget_pending(id);
                let lines = completion_lines(self.state.elapsed_seconds, self.state.flip_count);
                surface.show_message(&lines);
                surface.set_visible(Region::Message, true);
                tracing::info!(
                    session = self.state.session_id,
                    elapsed = self.state.elapsed_seconds,
                    flips = self.state.flip_count,
                    "all pairs matched"
                );
            }
        }
    }

    fn cancel_pending(&mut self, scheduler: &mut dyn Scheduler) {
        for id in self.state.pending.drain(..) {
            scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::game::headless::Harness;

    fn started(grid: &str) -> Harness {
        let mut h = Harness::new(Session::with_seed(Catalog::builtin(), 42));
        h.select(grid).unwrap();
        h.start().unwrap();
        h
    }

    #[test]
    fn start_resets_displays_and_hides_start_control() {
        let h = started("2x2");
        assert_eq!(h.surface.text(Region::FlipCount), "Flips: 0");
        assert_eq!(h.surface.text(Region::Timer), "00:00");
        assert!(!h.surface.is_visible(Region::Timer));
        assert!(h.surface.is_visible(Region::FlipCount));
        assert!(!h.surface.is_visible(Region::StartButton));
        assert!(!h.surface.is_visible(Region::Message));
        assert!(h.surface.is_visible(Region::Grid));
        assert_eq!(h.surface.grid, Some(GridSize { rows: 2, columns: 2 }));
        assert_eq!(h.surface.cards.len(), 4);
    }

    #[test]
    fn selecting_a_size_rearms_start_without_rebuilding() {
        let mut h = started("2x2");
        let grid = h.select("3x4").unwrap();
        assert_eq!(grid, GridSize { rows: 3, columns: 4 });
        assert_eq!(h.surface.text(Region::StartButton), START_LABEL);
        assert!(h.surface.is_visible(Region::StartButton));
        assert_eq!(h.session.cards().len(), 4);
    }

    #[test]
    fn invalid_selection_keeps_previous_grid() {
        let mut h = started("2x3");
        assert!(matches!(h.select("big"), Err(GameError::InvalidGridSize(_))));
        assert_eq!(h.session.grid(), GridSize { rows: 2, columns: 3 });
    }

    #[test]
    fn oversized_grid_fails_and_leaves_board_intact() {
        let mut h = started("2x2");
        let session = h.session.session_id();
        h.select("4x4").unwrap();
        assert!(matches!(
            h.start(),
            Err(GameError::InsufficientCatalog { needed: 8, available: 6 })
        ));
        assert_eq!(h.session.session_id(), session);
        assert_eq!(h.session.cards().len(), 4);
    }

    #[test]
    fn first_flip_starts_timer_and_offers_restart() {
        let mut h = started("2x2");
        assert_eq!(h.click(0), ClickOutcome::Flipped);
        assert!(h.session.state().timer_started);
        assert!(h.surface.is_visible(Region::Timer));
        assert_eq!(h.surface.text(Region::StartButton), RESTART_LABEL);
        assert!(h.surface.is_visible(Region::StartButton));
        assert_eq!(h.surface.card_classes(0), ["flipped", "locked"]);
    }

    #[test]
    fn clicking_the_same_card_twice_counts_once() {
        let mut h = started("2x2");
        h.click(0);
        assert_eq!(h.click(0), ClickOutcome::Ignored);
        assert_eq!(h.session.state().flip_count, 1);
        assert_eq!(h.surface.text(Region::FlipCount), "Flips: 1");
    }

    #[test]
    fn mismatch_locks_board_until_flip_back() {
        let mut h = started("3x4");
        let (a, b) = h.mismatched_pair();
        h.click(a);
        assert_eq!(h.click(b), ClickOutcome::Mismatched);
        assert!(h.session.state().board_locked);

        let third = (0..12).find(|idx| *idx != a && *idx != b).unwrap();
        assert_eq!(h.click(third), ClickOutcome::Ignored);
        assert_eq!(h.session.state().flip_count, 2);
        assert_eq!(h.session.cards()[third].status, CardStatus::Hidden);

        h.advance(899);
        assert!(h.session.state().board_locked);
        assert_eq!(h.session.cards()[a].status, CardStatus::Flipped);

        h.advance(1);
        assert!(!h.session.state().board_locked);
        for idx in [a, b] {
            assert_eq!(h.session.cards()[idx].status, CardStatus::Hidden);
            assert!(!h.session.cards()[idx].locked);
            assert!(h.surface.card_classes(idx).is_empty());
        }
        assert!(h.session.state().pending.is_empty());
    }

    #[test]
    fn match_never_schedules_flip_back() {
        let mut h = started("3x4");
        let pair = h.indices_of("1");
        h.click(pair[0]);
        assert_eq!(h.click(pair[1]), ClickOutcome::Matched);
        assert!(!h.session.state().board_locked);
        assert_eq!(h.session.state().matched_count, 2);
        assert!(!h.scheduler.has_event(|event| matches!(event, Deferred::FlipBack { .. })));

        h.advance(5_000);
        for idx in pair {
            assert_eq!(h.session.cards()[idx].status, CardStatus::Matched);
            assert_eq!(h.surface.card_classes(idx), ["matched", "locked"]);
        }
    }

    #[test]
    fn matched_cards_ignore_clicks() {
        let mut h = started("3x4");
        let pair = h.indices_of("2");
        h.click(pair[0]);
        h.click(pair[1]);
        assert_eq!(h.click(pair[0]), ClickOutcome::Ignored);
        assert_eq!(h.session.state().matched_count, 2);
        assert_eq!(h.session.state().flip_count, 2);
        assert_eq!(h.session.cards()[pair[0]].status, CardStatus::Matched);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut h = started("2x2");
        let old = h.surface.cards[0].handle;
        h.start().unwrap();
        assert_eq!(h.click_handle(old), ClickOutcome::Ignored);
        assert!(!h.session.state().timer_started);
        assert_eq!(h.session.state().flip_count, 0);

        let out_of_range = CardHandle {
            session: h.session.session_id(),
            index: 99,
        };
        assert_eq!(h.click_handle(out_of_range), ClickOutcome::Ignored);
    }

    #[test]
    fn clicks_before_any_game_are_ignored() {
        let mut h = Harness::new(Session::with_seed(Catalog::builtin(), 1));
        assert_eq!(h.click(0), ClickOutcome::Ignored);
        assert_eq!(h.scheduler.pending_count(), 0);
    }

    #[test]
    fn new_game_cancels_pending_flip_back() {
        let mut h = started("3x4");
        let (a, b) = h.mismatched_pair();
        h.click(a);
        h.click(b);
        assert_eq!(h.session.state().pending.len(), 1);

        h.start().unwrap();
        assert!(h.session.state().pending.is_empty());
        assert!(!h.session.state().board_locked);
        assert_eq!(h.scheduler.pending_count(), 0);

        let pair = h.indices_of("3");
        h.click(pair[0]);
        h.advance(900);
        assert_eq!(h.session.cards()[pair[0]].status, CardStatus::Flipped);
    }

    #[test]
    fn restart_stops_a_running_clock() {
        let mut h = started("2x2");
        h.click(0);
        h.advance(1_000);
        assert_eq!(h.surface.text(Region::Timer), "00:01");

        h.start().unwrap();
        assert_eq!(h.surface.text(Region::Timer), "00:00");
        assert_eq!(h.session.state().elapsed_seconds, 0);
        assert!(h.session.state().timer_handle.is_none());
        assert!(!h.session.state().timer_started);
        assert_eq!(h.scheduler.pending_count(), 0);
    }

    #[test]
    fn custom_timings_drive_every_callback() {
        let timings = Timings {
            tick: Duration::from_millis(100),
            flip_back: Duration::from_millis(50),
            end_message: Duration::from_millis(10),
        };
        let session = Session::with_seed(Catalog::builtin(), 42).with_timings(timings);
        let mut h = Harness::new(session);
        h.select("2x2").unwrap();
        h.start().unwrap();

        let (a, b) = h.mismatched_pair();
        h.click(a);
        h.click(b);
        h.advance(49);
        assert_eq!(h.session.cards()[a].status, CardStatus::Flipped);
        h.advance(1);
        assert_eq!(h.session.cards()[a].status, CardStatus::Hidden);
        assert_eq!(h.session.cards()[b].status, CardStatus::Hidden);
        assert_eq!(h.surface.text(Region::Timer), "00:00");

        h.advance(50);
        assert_eq!(h.surface.text(Region::Timer), "00:01");
        h.advance(100);
        assert_eq!(h.surface.text(Region::Timer), "00:02");
        assert_eq!(h.scheduler.now_ms(), 200);

        for name in ["1", "2"] {
            for idx in h.indices_of(name) {
                h.click(idx);
            }
        }
        assert!(h.session.is_complete());
        h.advance(9);
        assert!(h.surface.message.is_empty());
        h.advance(1);
        assert_eq!(h.scheduler.now_ms(), 210);
        assert_eq!(h.surface.message[1], "Time: 00:02 seconds");
        assert_eq!(h.surface.message[2], "Flips: 6");

        h.advance(1_000);
        assert_eq!(h.surface.text(Region::Timer), "00:02");
    }

    #[test]
    fn stale_callbacks_are_dropped() {
        let mut h = started("2x2");
        h.click(0);
        let stale = h.session.session_id() - 1;
        let id = h
            .scheduler
            .schedule_once(Duration::ZERO, Deferred::EndMessage { session: stale });
        h.advance(0);
        assert!(h.surface.message.is_empty());
        assert!(!h.scheduler.is_scheduled(id));
    }
}
