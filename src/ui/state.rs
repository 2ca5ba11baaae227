use std::collections::HashMap;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::game::{Region, Session, TimerId};

/// Widget handles for the fixed UI regions plus the live card buttons.
#[derive(Default)]
pub struct Widgets {
    pub start_button: Option<gtk::Button>,
    pub reset_button: Option<gtk::Button>,
    pub message_box: Option<gtk::Box>,
    pub board_grid: Option<gtk::Grid>,
    pub size_dropdown: Option<gtk::DropDown>,
    pub timer_label: Option<gtk::Label>,
    pub flip_label: Option<gtk::Label>,
    pub card_buttons: Vec<gtk::Button>,
    pub grid_columns: i32,
}

impl Widgets {
    pub fn widget(&self, region: Region) -> Option<gtk::Widget> {
        match region {
            Region::StartButton => self.start_button.clone().map(|w| w.upcast()),
            Region::ResetButton => self.reset_button.clone().map(|w| w.upcast()),
            Region::Message => self.message_box.clone().map(|w| w.upcast()),
            Region::Grid => self.board_grid.clone().map(|w| w.upcast()),
            Region::SizeSelector => self.size_dropdown.clone().map(|w| w.upcast()),
            Region::Timer => self.timer_label.clone().map(|w| w.upcast()),
            Region::FlipCount => self.flip_label.clone().map(|w| w.upcast()),
        }
    }
}

/// glib sources backing scheduled callbacks, keyed by the ids handed to the game.
#[derive(Default)]
pub struct TimerSources {
    pub next_id: u64,
    pub sources: HashMap<TimerId, glib::SourceId>,
}

impl TimerSources {
    pub fn allocate(&mut self) -> TimerId {
        self.next_id = self.next_id.wrapping_add(1);
        TimerId(self.next_id)
    }
}

pub struct UiState {
    pub session: Session,
    pub widgets: Widgets,
    pub timers: TimerSources,
}

impl UiState {
    pub fn new(session: Session) -> Self {
        UiState {
            session,
            widgets: Widgets::default(),
            timers: TimerSources::default(),
        }
    }
}
