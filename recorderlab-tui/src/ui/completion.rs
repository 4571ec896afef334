//! Completion popup under the symbol entry.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::theme;
use crate::ui::control_panel::SYMBOL_LABEL;

const MAX_ROWS: usize = 8;
const WIDTH: u16 = 32;

/// `anchor` is the control strip; `bounds` clips the popup.
pub fn render(f: &mut Frame, anchor: Rect, bounds: Rect, app: &AppState) {
    if app.overlay != Overlay::None {
        return;
    }
    let hits = app.completions();
    if hits.is_empty() {
        return;
    }

    // Keep the highlighted row visible.
    let cursor = app.completion_cursor.unwrap_or(0);
    let start = cursor.saturating_sub(MAX_ROWS - 1);
    let rows = hits.len().min(MAX_ROWS);

    let popup = Rect {
        x: anchor.x + 1 + SYMBOL_LABEL.len() as u16,
        y: anchor.y + 2,
        width: WIDTH,
        height: rows as u16 + 2,
    }
    .intersection(bounds);
    if popup.width < 3 || popup.height < 3 {
        return;
    }
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::neutral())
        .title(format!(" {} matches ", hits.len()))
        .title_style(theme::neutral());

    let lines: Vec<Line> = hits
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
        .map(|(i, symbol)| {
            if app.completion_cursor == Some(i) {
                Line::from(Span::styled(
                    format!("▸ {symbol}"),
                    theme::accent().add_modifier(Modifier::BOLD | Modifier::REVERSED),
                ))
            } else {
                Line::from(Span::styled(format!("  {symbol}"), theme::text()))
            }
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), popup);
}
