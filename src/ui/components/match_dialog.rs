//! Popup announcing a new match.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::api::Dev;

/// Modal shown when the match channel reports a mutual like.
///
/// Dismissing only hides the popup; the match itself lives in
/// `SwipeSession`.
#[derive(Debug, Clone, Default)]
pub struct MatchDialog {
    dev: Option<Dev>,
}

impl MatchDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the dialog for `dev`, replacing whatever was shown.
    pub fn show(&mut self, dev: Dev) {
        self.dev = Some(dev);
    }

    pub fn dismiss(&mut self) {
        self.dev = None;
    }

    pub fn is_visible(&self) -> bool {
        self.dev.is_some()
    }

    pub fn dev(&self) -> Option<&Dev> {
        self.dev.as_ref()
    }

    /// Handle a key while visible. Returns true if the dialog closed.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        if !self.is_visible() {
            return false;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.dismiss();
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(dev) = &self.dev else {
            return;
        };

        let popup = centered(area, 50, 9);
        let mut lines = vec![
            Line::from(Span::styled(
                "It's a match!",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                dev.display_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if !dev.bio_text().is_empty() {
            lines.push(Line::from(Span::styled(
                dev.bio_text().to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(avatar) = &dev.avatar {
            lines.push(Line::from(Span::styled(
                avatar.clone(),
                Style::default().fg(Color::Blue),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Match ")
            .title_bottom(Line::from(" Enter/Esc ").alignment(Alignment::Right));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            popup,
        );
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
