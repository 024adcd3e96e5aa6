//! Animated spinner for requests in flight.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A labelled spinner that only draws while active.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    label: String,
    frame: usize,
    active: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start spinning with a label, restarting the animation.
    pub fn start(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.frame = 0;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Advance one frame. No-op when stopped.
    pub fn tick(&mut self) {
        if self.active {
            self.frame = (self.frame + 1) % FRAMES.len();
        }
    }

    /// Current text, or empty when stopped.
    pub fn text(&self) -> String {
        if self.active {
            format!("{} {}", FRAMES[self.frame], self.label)
        } else {
            String::new()
        }
    }

    /// Draw centered in `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.active {
            return;
        }
        let paragraph = Paragraph::new(self.text())
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}
