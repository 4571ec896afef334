//! Bottom status bar: bridge counters, fault count, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let pending = app.bridge.pending();
    let mut spans: Vec<Span> = vec![
        Span::styled(
            format!(" contracts {} ", app.controller.completion_source().len()),
            theme::muted(),
        ),
        Span::styled(
            format!("delivered {} ", app.bridge.delivered()),
            theme::positive(),
        ),
        Span::styled(format!("pending {pending}"), theme::backlog(pending)),
    ];
    if !app.error_history.is_empty() {
        spans.push(Span::styled(
            format!(" faults {} [F6]", app.error_history.len()),
            theme::negative(),
        ));
    }
    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
