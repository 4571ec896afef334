//! Overlay widgets: welcome, key help, engine fault history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to RecorderLab ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "  1. Type part of a symbol; pick a match with Up/Down and Tab",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  2. F2 starts bar recording, F4 starts tick recording",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. PageUp/PageDown set how often the recorder flushes",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  4. Watch the log for what the recorder did",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Key reference overlay.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [Esc]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Symbol entry");
    key(&mut lines, "type", "Edit the symbol");
    key(&mut lines, "Up / Down", "Move through matches");
    key(&mut lines, "Tab / Enter", "Take the highlighted match");
    key(&mut lines, "Ctrl+U", "Clear the symbol");
    lines.push(Line::from(""));

    section(&mut lines, "Recording");
    key(&mut lines, "F2 / F3", "Add / remove bar recording");
    key(&mut lines, "F4 / F5", "Add / remove tick recording");
    key(&mut lines, "PgUp / PgDn", "Flush interval up / down");
    lines.push(Line::from(""));

    section(&mut lines, "Log");
    key(&mut lines, "Up / Down", "Scroll when no matches are shown");
    key(&mut lines, "End", "Follow newest");
    lines.push(Line::from(""));

    section(&mut lines, "General");
    key(&mut lines, "F1", "Toggle this help");
    key(&mut lines, "F6", "Engine fault history");
    key(&mut lines, "Esc / Ctrl+C", "Quit");

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Engine faults, newest last. Opens by itself when a fault arrives.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Engine faults ({}) [Esc]close [Up/Down]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No engine faults.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    // Two lines per fault.
    let visible = (inner.height as usize / 2).max(1);
    let start = app.error_scroll.min(app.error_history.len() - 1);
    let end = (start + visible).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for (i, fault) in app.error_history[start..end].iter().enumerate() {
        let style = if start + i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::negative()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", fault.received_at.format("%H:%M:%S")), theme::muted()),
            Span::styled(fault.error.as_str(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("          while {}", fault.context),
            theme::muted(),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>14}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
