use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use adw::prelude::*;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::prelude::*;
use libadwaita as adw;

use crate::game::config::{DEFAULT_GRID_SIZE, GRID_SIZE_OPTIONS};
use crate::game::session::START_LABEL;
use crate::game::timer::{flips_label, format_mm_ss};
use crate::game::{Catalog, Region, Scheduler, Session, Surface};

use super::board::{build_board_grid, CONTENT_MARGIN};
use super::hud::GtkSurface;
use super::scheduler::GlibScheduler;
use super::state::UiState;

/// Borrows the shared state once and hands the session its surface and scheduler.
pub(super) fn with_session<R>(
    state: &Rc<RefCell<UiState>>,
    f: impl FnOnce(&mut Session, &mut dyn Surface, &mut dyn Scheduler) -> R,
) -> R {
    let mut st = state.borrow_mut();
    let UiState {
        session,
        widgets,
        timers,
    } = &mut *st;
    let mut surface = GtkSurface {
        widgets,
        state: Rc::downgrade(state),
    };
    let mut scheduler = GlibScheduler {
        timers,
        state: Rc::downgrade(state),
    };
    f(session, &mut surface, &mut scheduler)
}

fn start_game(state: &Rc<RefCell<UiState>>) {
    with_session(state, |session, surface, scheduler| {
        if let Err(err) = session.start_game(surface, scheduler) {
            tracing::error!(%err, "failed to start game");
            surface.show_message(&[err.to_string()]);
            surface.set_visible(Region::Message, true);
        }
    });
}

fn select_grid_size(state: &Rc<RefCell<UiState>>, value: &str) {
    with_session(state, |session, surface, _| {
        if let Err(err) = session.select_grid_size(value, surface) {
            tracing::error!(%err, "rejected grid size");
            surface.show_message(&[err.to_string()]);
            surface.set_visible(Region::Message, true);
        }
    });
}

fn load_catalog() -> Catalog {
    Catalog::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to built-in catalog");
        Catalog::builtin()
    })
}

pub fn run() -> glib::ExitCode {
    glib::set_prgname(Some("io.basshift.Concentration"));
    let app = adw::Application::builder()
        .application_id("io.basshift.Concentration")
        .build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new(RefCell::new(UiState::new(Session::new(load_catalog()))));

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);

        let title = gtk::Label::new(None);
        title.set_markup("<b>Concentration</b>");
        title.set_halign(gtk::Align::Center);

        let header = adw::HeaderBar::builder().title_widget(&title).build();
        header.add_css_class("flat");

        let reset_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        reset_button.set_tooltip_text(Some("New Game"));
        reset_button.connect_clicked({
            let state = state.clone();
            move |_| start_game(&state)
        });
        header.pack_end(&reset_button);

        let game_view = build_game_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Concentration")
            .default_width(640)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 480);

        state.borrow_mut().widgets.reset_button = Some(reset_button);
        win.present();
    });

    app.run()
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("concentration.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource("/io/basshift/Concentration/style.css");
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_game_view(state: &Rc<RefCell<UiState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.set_margin_top(CONTENT_MARGIN);
    root.set_margin_bottom(CONTENT_MARGIN);
    root.set_margin_start(CONTENT_MARGIN);
    root.set_margin_end(CONTENT_MARGIN);

    let controls = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    controls.set_halign(gtk::Align::Center);

    let size_dropdown = gtk::DropDown::from_strings(&GRID_SIZE_OPTIONS);
    let default_grid = DEFAULT_GRID_SIZE.to_string();
    if let Some(pos) = GRID_SIZE_OPTIONS.iter().position(|option| *option == default_grid) {
        size_dropdown.set_selected(pos as u32);
    }
    size_dropdown.set_tooltip_text(Some("Grid size"));
    size_dropdown.connect_selected_notify({
        let state = state.clone();
        move |dropdown| {
            if let Some(value) = GRID_SIZE_OPTIONS.get(dropdown.selected() as usize) {
                select_grid_size(&state, value);
            }
        }
    });

    let start_button = gtk::Button::with_label(START_LABEL);
    start_button.add_css_class("suggested-action");
    start_button.connect_clicked({
        let state = state.clone();
        move |_| start_game(&state)
    });

    controls.append(&size_dropdown);
    controls.append(&start_button);

    let hud = gtk::Box::new(gtk::Orientation::Horizontal, 24);
    hud.set_halign(gtk::Align::Center);

    let timer_label = gtk::Label::new(Some(&format_mm_ss(0)));
    timer_label.add_css_class("hud-label");
    timer_label.set_visible(false);

    let flip_label = gtk::Label::new(Some(&flips_label(0)));
    flip_label.add_css_class("hud-label");
    flip_label.set_visible(false);

    hud.append(&timer_label);
    hud.append(&flip_label);

    let message_box = gtk::Box::new(gtk::Orientation::Vertical, 4);
    message_box.add_css_class("message-area");
    message_box.set_halign(gtk::Align::Center);
    message_box.set_visible(false);

    let board_grid = build_board_grid();
    board_grid.set_vexpand(true);
    board_grid.set_visible(false);

    root.append(&controls);
    root.append(&hud);
    root.append(&message_box);
    root.append(&board_grid);

    {
        let mut st = state.borrow_mut();
        let widgets = &mut st.widgets;
        widgets.start_button = Some(start_button);
        widgets.size_dropdown = Some(size_dropdown);
        widgets.timer_label = Some(timer_label);
        widgets.flip_label = Some(flip_label);
        widgets.message_box = Some(message_box);
        widgets.board_grid = Some(board_grid);
    }

    root
}
