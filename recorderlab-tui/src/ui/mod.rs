//! Top-level UI layout: control strip, recording lists, log, status bar.

pub mod completion;
pub mod control_panel;
pub mod log_panel;
pub mod overlays;
pub mod recording_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::theme;

/// Height of the control strip including borders.
const CONTROL_HEIGHT: u16 = 5;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    f.render_widget(Block::default().style(theme::background()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CONTROL_HEIGHT),
            Constraint::Min(6),
            Constraint::Percentage(40),
            Constraint::Length(1),
        ])
        .split(f.area());

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    control_panel::render(f, chunks[0], app);
    recording_panel::render(
        f,
        lists[0],
        "Bar recordings",
        app.controller.bar_recordings(),
        theme::accent(),
    );
    recording_panel::render(
        f,
        lists[1],
        "Tick recordings",
        app.controller.tick_recordings(),
        theme::positive(),
    );
    log_panel::render(f, chunks[2], app);
    status_bar::render(f, chunks[3], app);

    // Popup floats over the lists, anchored under the input line.
    let main_area = f.area();
    completion::render(f, chunks[0], main_area, app);

    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
