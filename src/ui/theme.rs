//! Theme and styling configuration.

use ratatui::style::{Color, Modifier, Style};

/// Colors used by the card stack and its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Card outline.
    pub card_border: Color,
    /// Developer name on a card.
    pub name: Color,
    /// Bio text and the empty-queue message.
    pub muted: Color,
    /// Like button.
    pub like: Color,
    /// Dislike button.
    pub dislike: Color,
    /// Header, focus and key hints.
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            card_border: Color::Gray,
            name: Color::White,
            muted: Color::DarkGray,
            like: Color::Green,
            dislike: Color::Red,
            accent: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn name_style(&self) -> Style {
        Style::default().fg(self.name).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Outline of the card at `depth` behind the front (0 = front).
    pub fn card_border_style(&self, depth: usize) -> Style {
        if depth == 0 {
            Style::default().fg(self.card_border)
        } else {
            Style::default().fg(self.muted)
        }
    }
}
