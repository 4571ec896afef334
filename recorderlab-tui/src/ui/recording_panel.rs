//! Bar and tick recording lists, rendered straight from the last snapshot.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, title: &str, items: &[String], style: Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(format!(" {title} ({}) ", items.len()))
        .title_style(style);

    let lines: Vec<Line> = if items.is_empty() {
        vec![Line::from(Span::styled(" none", theme::muted()))]
    } else {
        items
            .iter()
            .map(|s| Line::from(Span::styled(format!(" {s}"), style)))
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
