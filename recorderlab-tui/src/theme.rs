//! Parrot/neon theme tokens for the RecorderLab TUI.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, entered text, bar list)
//! - **Positive**: Neon green (tick list, healthy counters)
//! - **Negative**: Hot pink (engine faults)
//! - **Warning**: Neon orange (pending queue, warnings)
//! - **Neutral**: Cool purple (completion popup)
//! - **Muted**: Steel blue (labels, hints, log text)

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub const fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }

    /// Color for the bridge backlog indicator.
    pub fn backlog_color(&self, pending: usize) -> Color {
        match pending {
            0 => self.muted,
            1..=99 => self.accent,
            _ => self.warning,
        }
    }
}

const THEME: Theme = Theme::parrot_neon();

pub fn background() -> Style {
    Style::default().bg(THEME.background)
}

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(THEME.positive)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn backlog(pending: usize) -> Style {
    Style::default().fg(THEME.backlog_color(pending))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_backlog_color() {
        let theme = Theme::default();
        assert_eq!(theme.backlog_color(0), theme.muted);
        assert_eq!(theme.backlog_color(5), theme.accent);
        assert_eq!(theme.backlog_color(500), theme.warning);
    }
}
