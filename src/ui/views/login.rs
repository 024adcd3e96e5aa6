//! Sign-in screen: asks for a GitHub username.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use crate::ui::components::TextInput;

/// What the login form asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// Register or sign in with this GitHub username.
    Submit(String),
    /// Leave the application.
    Quit,
}

/// The sign-in form.
#[derive(Debug, Clone)]
pub struct LoginView {
    input: TextInput,
    submitting: bool,
    error: Option<String>,
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            input: TextInput::with_placeholder("GitHub username"),
            submitting: false,
            error: None,
        }
    }

    pub fn username(&self) -> &str {
        self.input.value()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sign-in failed; allow another attempt.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    /// Forget the previous attempt.
    pub fn reset(&mut self) {
        self.input.clear();
        self.submitting = false;
        self.error = None;
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<LoginAction> {
        match key.code {
            KeyCode::Esc => Some(LoginAction::Quit),
            KeyCode::Enter => {
                let username = self.input.value().trim();
                if self.submitting || username.is_empty() {
                    return None;
                }
                let username = username.to_string();
                self.submitting = true;
                self.error = None;
                Some(LoginAction::Submit(username))
            }
            // The field is locked while a request is in flight.
            _ if self.submitting => None,
            _ => {
                if self.input.handle_input(key) {
                    self.error = None;
                }
                None
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [form] = Layout::vertical([Constraint::Length(6)])
            .flex(Flex::Center)
            .areas(area);
        let [form] = Layout::horizontal([Constraint::Length(40u16.min(area.width))])
            .flex(Flex::Center)
            .areas(form);
        let [title, field, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(form);

        frame.render_widget(
            Paragraph::new("devswipe")
                .style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center),
            title,
        );

        self.input
            .render(frame, field, "GitHub", !self.submitting);

        let status_line = match (&self.error, self.submitting) {
            (Some(error), _) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            (None, true) => {
                Paragraph::new("Signing in...").style(Style::default().fg(Color::DarkGray))
            }
            (None, false) => Paragraph::new(""),
        };
        frame.render_widget(status_line.alignment(Alignment::Center), status);
    }
}
