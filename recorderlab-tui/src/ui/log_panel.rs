//! Engine log pane: newest at the bottom, scrollable.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let log = app.controller.log();
    let title = if app.log_scroll > 0 {
        format!(" Log ({}) [↑{}] [End]follow ", log.len(), app.log_scroll)
    } else {
        format!(" Log ({}) ", log.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(title)
        .title_style(theme::muted());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let end = log.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(height);

    let lines: Vec<Line> = log[start..end]
        .iter()
        .map(String::as_str)
        .map(render_entry)
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Split the "HH:MM:SS\tmessage" form into styled spans.
fn render_entry(entry: &str) -> Line<'_> {
    match entry.split_once('\t') {
        Some((time, message)) => Line::from(vec![
            Span::styled(format!(" {time}  "), theme::muted()),
            Span::styled(message, theme::text()),
        ]),
        None => Line::from(Span::styled(entry, theme::text())),
    }
}
