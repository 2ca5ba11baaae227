use std::cell::RefCell;
use std::path::Path;
use std::rc::Weak;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use crate::game::{Card, CardHandle};

use super::app::with_session;
use super::state::UiState;

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 6;
const CARD_CLASSES: [&str; 3] = ["flipped", "locked", "matched"];

pub fn build_board_grid() -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("concentration-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    grid.set_halign(gtk::Align::Center);
    grid.set_valign(gtk::Align::Center);
    grid
}

fn draw_centered_text(
    area: &gtk::DrawingArea,
    cr: &cairo::Context,
    width: i32,
    height: i32,
    text: &str,
    bold: bool,
) {
    let min_dim = width.min(height) as f64;
    let font_size = if bold { min_dim * 0.34 } else { min_dim * 0.40 };

    cr.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family("Cantarell, Noto Sans, sans");
    if bold {
        font_desc.set_weight(pango::Weight::Bold);
    }
    font_desc.set_size((font_size * pango::SCALE as f64) as i32);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    #[allow(deprecated)]
    let fg = area.style_context().color();
    cr.set_source_rgba(
        fg.red() as f64,
        fg.green() as f64,
        fg.blue() as f64,
        fg.alpha() as f64,
    );

    let (text_width, text_height) = layout.pixel_size();
    cr.move_to(
        (width as f64 - text_width as f64) / 2.0,
        (height as f64 - text_height as f64) / 2.0,
    );

    pangocairo::functions::show_layout(cr, &layout);
}

fn text_face(text: String, bold: bool) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .build();
    area.add_css_class("concentration-card-label");
    area.set_draw_func(move |area, cr, width, height| {
        draw_centered_text(area, cr, width, height, &text, bold);
    });
    area
}

/// Front face shows the catalog image, or its label when the file is missing.
fn front_face(card: &Card) -> gtk::Widget {
    let path = Path::new(&card.entry.image_source);
    if path.is_file() {
        let picture = gtk::Picture::for_filename(path);
        picture.set_can_shrink(true);
        picture.upcast()
    } else {
        tracing::debug!(path = %path.display(), "card image missing, drawing label");
        text_face(card.name().to_string(), false).upcast()
    }
}

pub fn build_card_button(
    handle: CardHandle,
    card: &Card,
    state: Weak<RefCell<UiState>>,
) -> gtk::Button {
    let faces = gtk::Stack::new();
    faces.set_transition_type(gtk::StackTransitionType::Crossfade);
    faces.set_transition_duration(200);
    faces.add_named(&text_face("?".to_string(), true), Some("back"));
    faces.add_named(&front_face(card), Some("front"));

    let button = gtk::Button::builder()
        .css_classes(vec!["concentration-card"])
        .build();
    button.set_hexpand(true);
    button.set_vexpand(true);
    button.set_child(Some(&faces));
    apply_card_state(&button, card);

    button.connect_clicked(move |_| {
        let Some(state) = state.upgrade() else {
            return;
        };
        with_session(&state, |session, surface, scheduler| {
            session.handle_card_click(handle, surface, scheduler);
        });
    });

    button
}

pub fn apply_card_state(button: &gtk::Button, card: &Card) {
    for class in CARD_CLASSES {
        button.remove_css_class(class);
    }
    for class in card.css_classes() {
        button.add_css_class(class);
    }
    if let Some(faces) = button.child().and_downcast::<gtk::Stack>() {
        faces.set_visible_child_name(if card.is_face_up() { "front" } else { "back" });
    }
}
