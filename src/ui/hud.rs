use std::cell::RefCell;
use std::rc::Weak;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::game::{Card, CardHandle, GridSize, Region, Surface};

use super::board::{apply_card_state, build_card_button};
use super::state::{UiState, Widgets};

/// Renders game output onto the window's widgets.
pub(super) struct GtkSurface<'a> {
    pub widgets: &'a mut Widgets,
    pub state: Weak<RefCell<UiState>>,
}

impl Surface for GtkSurface<'_> {
    fn set_text(&mut self, region: Region, text: &str) {
        let w = &self.widgets;
        match region {
            Region::StartButton => {
                if let Some(button) = &w.start_button {
                    button.set_label(text);
                }
            }
            Region::ResetButton => {
                if let Some(button) = &w.reset_button {
                    button.set_tooltip_text(Some(text));
                }
            }
            Region::Timer => {
                if let Some(label) = &w.timer_label {
                    label.set_text(text);
                }
            }
            Region::FlipCount => {
                if let Some(label) = &w.flip_label {
                    label.set_text(text);
                }
            }
            Region::Message => self.show_message(&[text.to_string()]),
            Region::Grid | Region::SizeSelector => {
                tracing::trace!(?region, "region has no text");
            }
        }
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        if let Some(widget) = self.widgets.widget(region) {
            widget.set_visible(visible);
        }
    }

    fn show_message(&mut self, lines: &[String]) {
        let Some(message_box) = &self.widgets.message_box else {
            return;
        };
        while let Some(child) = message_box.first_child() {
            message_box.remove(&child);
        }
        for line in lines {
            let label = gtk::Label::new(Some(line));
            label.set_wrap(true);
            label.set_justify(gtk::Justification::Center);
            message_box.append(&label);
        }
    }

    fn clear_grid(&mut self) {
        if let Some(grid) = &self.widgets.board_grid {
            while let Some(child) = grid.first_child() {
                grid.remove(&child);
            }
        }
        self.widgets.card_buttons.clear();
    }

    fn layout_grid(&mut self, grid: GridSize) {
        self.widgets.grid_columns = grid.columns as i32;
    }

    fn add_card(&mut self, handle: CardHandle, card: &Card) {
        let Some(grid) = &self.widgets.board_grid else {
            return;
        };
        let columns = self.widgets.grid_columns.max(1);
        let button = build_card_button(handle, card, self.state.clone());
        let i = handle.index as i32;
        grid.attach(&button, i % columns, i / columns, 1, 1);
        self.widgets.card_buttons.push(button);
    }

    fn render_card(&mut self, index: usize, card: &Card) {
        if let Some(button) = self.widgets.card_buttons.get(index) {
            apply_card_state(button, card);
        }
    }
}
