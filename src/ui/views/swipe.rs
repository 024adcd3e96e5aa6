//! The card stack screen.
//!
//! Rendering is split in two: `SwipeContent::from_session` decides what is on
//! screen from the session alone, and `SwipeView::render` draws it. Tests
//! exercise the first without a terminal.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::Dev;
use crate::events::KeyContext;
use crate::swipe::SwipeSession;
use crate::ui::theme::Theme;

/// Shown when no candidates are left.
pub const EMPTY_MESSAGE: &str = "Acabou :(";

/// Lines of bio shown on a card.
pub const BIO_LINES: usize = 3;

const CARD_WIDTH: u16 = 46;
// borders + avatar + name + gap + bio
const CARD_HEIGHT: u16 = 2 + 3 + BIO_LINES as u16;

/// A card to draw, front first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub dev: &'a Dev,
    /// Stacking priority, `len - index`. The front card has the highest.
    pub priority: usize,
    /// How many cards sit in front of this one.
    pub depth: usize,
}

/// What the swipe screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeContent<'a> {
    /// The queue is empty: show `EMPTY_MESSAGE`, no cards, no buttons.
    Empty,
    /// Cards front first, at most `stack_depth` of them.
    Cards(Vec<Card<'a>>),
}

impl<'a> SwipeContent<'a> {
    pub fn from_session(session: &'a SwipeSession, stack_depth: usize) -> Self {
        if session.queue().is_empty() {
            return SwipeContent::Empty;
        }
        let cards = session
            .queue()
            .stacked()
            .take(stack_depth.max(1))
            .enumerate()
            .map(|(depth, (priority, dev))| Card {
                dev,
                priority,
                depth,
            })
            .collect();
        SwipeContent::Cards(cards)
    }

    /// Whether the like/dislike buttons are drawn.
    pub fn shows_controls(&self) -> bool {
        matches!(self, SwipeContent::Cards(_))
    }
}

/// Word-wrap `text` to `width` columns and keep at most `max_lines`,
/// ending the last kept line with `…` when something was cut.
pub fn clip_bio(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        // Hard-split words longer than a line.
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let keep = width.saturating_sub(1);
            if last.chars().count() > keep {
                *last = last.chars().take(keep).collect();
            }
            last.push('…');
        }
    }
    lines
}

/// Draws a `SwipeSession`.
#[derive(Debug, Clone)]
pub struct SwipeView {
    stack_depth: usize,
    theme: Theme,
}

impl SwipeView {
    pub fn new(stack_depth: usize, theme: Theme) -> Self {
        Self { stack_depth, theme }
    }

    /// Help bar context for the current state.
    pub fn context(session: &SwipeSession) -> KeyContext {
        if session.can_decide() {
            KeyContext::Swipe
        } else {
            KeyContext::SwipeEmpty
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, session: &SwipeSession) {
        let [stack_area, controls_area, status_area] = Layout::vertical([
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let content = SwipeContent::from_session(session, self.stack_depth);
        match &content {
            SwipeContent::Empty => self.render_empty(frame, stack_area),
            SwipeContent::Cards(cards) => {
                // Back to front so the front card is drawn last.
                for card in cards.iter().rev() {
                    self.render_card(frame, stack_area, card);
                }
                self.render_controls(frame, controls_area);
            }
        }

        self.render_status(frame, status_area, session);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let [line] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(
            Paragraph::new(EMPTY_MESSAGE)
                .style(self.theme.muted_style().add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            line,
        );
    }

    fn card_rect(area: Rect, depth: usize) -> Rect {
        let depth = u16::try_from(depth).unwrap_or(u16::MAX);
        let width = CARD_WIDTH
            .min(area.width)
            .saturating_sub(depth.saturating_mul(4));
        let height = CARD_HEIGHT.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        // Cards behind peek out below the front one.
        let top = area.y + area.height.saturating_sub(height.saturating_add(2)) / 2;
        let y = top
            .saturating_add(depth)
            .min(area.bottom().saturating_sub(height));
        Rect::new(x, y, width, height)
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, card: &Card<'_>) {
        let rect = Self::card_rect(area, card.depth);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.card_border_style(card.depth));

        frame.render_widget(Clear, rect);
        if card.depth > 0 {
            frame.render_widget(block, rect);
            return;
        }

        let inner_width = rect.width.saturating_sub(2) as usize;
        let avatar = card.dev.avatar.as_deref().unwrap_or("sem avatar");
        let mut lines = vec![
            Line::from(vec![
                Span::styled("◉ ", Style::default().fg(self.theme.accent)),
                Span::styled(avatar.to_string(), self.theme.muted_style()),
            ]),
            Line::from(Span::styled(
                card.dev.display_name().to_string(),
                self.theme.name_style(),
            )),
            Line::default(),
        ];
        lines.extend(
            clip_bio(card.dev.bio_text(), inner_width, BIO_LINES)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, self.theme.muted_style()))),
        );

        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                "[←] Dislike",
                Style::default()
                    .fg(self.theme.dislike)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("      "),
            Span::styled(
                "Like [→]",
                Style::default()
                    .fg(self.theme.like)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, session: &SwipeSession) {
        let mut spans = vec![Span::styled(
            format!("{} left", session.queue().len()),
            self.theme.muted_style(),
        )];
        if let Some(dev) = session.current_match() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("Last match: {}", dev.display_name()),
                Style::default().fg(self.theme.accent),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
