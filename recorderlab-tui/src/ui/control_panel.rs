//! Control strip: symbol entry, flush interval selector, command keys.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use recorderlab_core::FlushInterval;

use crate::app::{AppState, Overlay};
use crate::theme;

/// Label in front of the entry field; the completion popup aligns to it.
pub const SYMBOL_LABEL: &str = " Symbol    ";

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.overlay == Overlay::None;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(" Recorder ")
        .title_style(theme::panel_title(active));

    let interval = app.controller.flush_interval();
    let lines = vec![
        Line::from(vec![
            Span::styled(SYMBOL_LABEL, theme::muted()),
            Span::styled(app.symbol_input.as_str(), theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
        Line::from(vec![
            Span::styled(" Interval  ", theme::muted()),
            Span::styled(arrow(interval.secs() > FlushInterval::MIN, "◂ "), theme::muted()),
            Span::styled(interval.to_string(), theme::text()),
            Span::styled(arrow(interval.secs() < FlushInterval::MAX, " ▸"), theme::muted()),
            Span::styled("  [PgUp/PgDn]", theme::muted()),
        ]),
        Line::from(vec![
            Span::styled(" Bar ", theme::accent()),
            Span::styled("[F2]add [F3]remove   ", theme::muted()),
            Span::styled("Tick ", theme::positive()),
            Span::styled("[F4]add [F5]remove   ", theme::muted()),
            Span::styled("[F1]help", theme::muted()),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn arrow(enabled: bool, glyph: &'static str) -> &'static str {
    if enabled {
        glyph
    } else {
        "  "
    }
}
