//! Transient toast messages shown in the bottom-right corner.
//!
//! Failures the user should know about (a like that did not reach the
//! server, a dropped match channel) surface here instead of interrupting the
//! swipe flow.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// How many toasts stay on screen at once.
const MAX_VISIBLE: usize = 3;

/// Widest a toast may grow.
const MAX_WIDTH: u16 = 48;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    fn icon(self) -> &'static str {
        match self {
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }

    /// Accent color of the level.
    pub fn color(self) -> Color {
        match self {
            ToastLevel::Info => Color::Blue,
            ToastLevel::Success => Color::Green,
            ToastLevel::Warning => Color::Yellow,
            ToastLevel::Error => Color::Red,
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            ToastLevel::Info | ToastLevel::Success => Duration::from_secs(3),
            ToastLevel::Warning | ToastLevel::Error => Duration::from_secs(5),
        }
    }
}

/// A single message with an expiry.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
    lifetime: Duration,
}

impl Toast {
    /// Create a toast that lives for its level's default lifetime.
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
            lifetime: level.lifetime(),
        }
    }

    /// Override how long the toast stays up.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Whether the toast has outlived its lifetime.
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.lifetime
    }

    fn height_for(&self, inner_width: usize) -> u16 {
        // icon + space
        let len = self.message.chars().count() + 2;
        let lines = if inner_width == 0 {
            1
        } else {
            len.div_ceil(inner_width)
        };
        lines as u16 + 2
    }
}

/// The stack of live toasts.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast, evicting the oldest when the stack is full.
    pub fn push(&mut self, toast: Toast) {
        self.queue.push_back(toast);
        while self.queue.len() > MAX_VISIBLE {
            self.queue.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastLevel::Info, message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastLevel::Success, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastLevel::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastLevel::Error, message));
    }

    /// Drop expired toasts. Called once per tick.
    pub fn tick(&mut self) {
        self.queue.retain(|toast| !toast.is_expired());
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    /// Draw the stack anchored to the bottom-right corner of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.queue.is_empty() {
            return;
        }

        let width = MAX_WIDTH.min(area.width.saturating_sub(2));
        let inner_width = width.saturating_sub(2) as usize;
        let x = area.x + area.width.saturating_sub(width + 1);
        let mut bottom = area.y + area.height.saturating_sub(1);

        // Newest toast sits lowest.
        for toast in self.queue.iter().rev() {
            let height = toast.height_for(inner_width);
            if bottom < area.y + height {
                break;
            }
            bottom -= height;
            render_toast(frame, toast, Rect::new(x, bottom, width, height));
        }
    }
}

fn render_toast(frame: &mut Frame, toast: &Toast, area: Rect) {
    let style = Style::default().fg(toast.level.color());
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", toast.level.icon()),
            style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(toast.message.as_str(), style),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
