//! Main application state and event loop.
//!
//! This module follows The Elm Architecture: terminal events go through
//! `update`, background results through `handle_message`, and `view` draws
//! the current state. Network work is never started here directly; the app
//! queues `Request`s that the main loop hands to the task runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::api::{Decision, Dev};
use crate::config::Config;
use crate::error::AppError;
use crate::events::{Event, KeyBindings, KeyContext, SwipeKey};
use crate::realtime::RealtimeEvent;
use crate::session::{SessionStore, SESSION_USER_KEY};
use crate::swipe::SwipeSession;
use crate::tasks::{ApiMessage, Request};
use crate::ui::{
    render_context_help, LoginAction, LoginView, MatchDialog, Spinner, SwipeView, Theme, Toasts,
};

/// Screens the app can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The sign-in form.
    Login,
    /// The swipe screen for a signed-in user id.
    Main { user: String },
}

impl Route {
    /// Pick the first screen: an explicit user, then the persisted one,
    /// otherwise sign-in.
    pub fn initial(explicit_user: Option<String>, store: &SessionStore) -> Self {
        match explicit_user
            .filter(|user| !user.trim().is_empty())
            .or_else(|| store.user())
        {
            Some(user) => Route::Main { user },
            None => Route::Login,
        }
    }
}

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Login,
    Swipe,
    Exiting,
}

/// The main application struct that holds all state.
pub struct App {
    state: AppState,
    should_quit: bool,
    store: SessionStore,
    key_bindings: KeyBindings,
    /// Present while a user is signed in.
    swipe: Option<SwipeSession>,
    /// Whether the match channel for the current identity is up.
    live: bool,
    /// The match channel could not be started; reload tries again.
    subscription_lost: bool,
    login_view: LoginView,
    swipe_view: SwipeView,
    match_dialog: MatchDialog,
    toasts: Toasts,
    spinner: Spinner,
    /// Work for the task runner, drained by `take_requests`.
    pending: Vec<Request>,
}

impl App {
    /// Create the app on the sign-in screen.
    pub fn new(config: &Config, store: SessionStore) -> Self {
        Self {
            state: AppState::Login,
            should_quit: false,
            store,
            key_bindings: KeyBindings::new(config.settings.vim_mode),
            swipe: None,
            live: false,
            subscription_lost: false,
            login_view: LoginView::new(),
            swipe_view: SwipeView::new(config.settings.stack_depth, Theme::default()),
            match_dialog: MatchDialog::new(),
            toasts: Toasts::new(),
            spinner: Spinner::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The swipe screen state, when signed in.
    pub fn swipe(&self) -> Option<&SwipeSession> {
        self.swipe.as_ref()
    }

    pub fn identity(&self) -> Option<&str> {
        self.swipe.as_ref().map(SwipeSession::identity)
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn match_dialog(&self) -> &MatchDialog {
        &self.match_dialog
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Hand over the queued requests.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.pending)
    }

    /// Switch screens. Entering `Main` loads the queue and opens the match
    /// channel for that user; leaving it closes the channel.
    pub fn navigate(&mut self, route: Route) {
        info!(?route, "Navigating");
        self.match_dialog.dismiss();
        self.live = false;
        self.subscription_lost = false;

        match route {
            Route::Login => {
                if self.swipe.take().is_some() {
                    self.pending.push(Request::Unsubscribe);
                }
                self.spinner.stop();
                self.login_view.reset();
                self.state = AppState::Login;
            }
            Route::Main { user } => {
                self.swipe = Some(SwipeSession::new(user.clone()));
                self.spinner.start("Loading developers");
                self.pending.push(Request::LoadDevs { user: user.clone() });
                self.pending.push(Request::Subscribe { user });
                self.state = AppState::Swipe;
            }
        }
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => self.quit(),
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key);
            }
            Event::Resize(width, height) => trace!(width, height, "Terminal resized"),
            Event::Tick => {
                self.spinner.tick();
                self.toasts.tick();
            }
        }
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.should_quit = true;
        self.state = AppState::Exiting;
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        // The match dialog swallows input while shown.
        if self.match_dialog.is_visible() {
            self.match_dialog.handle_input(key);
            return;
        }

        match self.state {
            AppState::Login => match self.login_view.handle_input(key) {
                Some(LoginAction::Submit(username)) => {
                    info!(%username, "Signing in");
                    self.spinner.start("Signing in");
                    self.pending.push(Request::Register { username });
                }
                Some(LoginAction::Quit) => self.quit(),
                None => {}
            },
            AppState::Swipe => {
                if let Some(action) = self.key_bindings.swipe_key(key) {
                    self.handle_swipe_key(action);
                }
            }
            AppState::Exiting => {}
        }
    }

    fn handle_swipe_key(&mut self, action: SwipeKey) {
        match action {
            SwipeKey::Like => self.decide(Decision::Like),
            SwipeKey::Dislike => self.decide(Decision::Dislike),
            SwipeKey::OpenAvatar => self.open_avatar(),
            SwipeKey::Reload => self.reload(),
            SwipeKey::Logout => self.logout(),
            SwipeKey::Quit => self.quit(),
        }
    }

    /// Remove the front card and send the decision. No-op on an empty queue.
    pub fn decide(&mut self, decision: Decision) {
        let Some(session) = self.swipe.as_mut() else {
            return;
        };
        let Some(dev) = session.decide(decision) else {
            debug!(%decision, "Nothing to decide on");
            return;
        };
        self.pending.push(Request::Decide {
            user: session.identity().to_string(),
            dev_id: dev.id,
            decision,
        });
    }

    /// Fetch the queue again, reopening the match channel if it was lost.
    pub fn reload(&mut self) {
        let Some(user) = self.identity().map(str::to_string) else {
            return;
        };
        self.spinner.start("Loading developers");
        self.pending.push(Request::LoadDevs { user: user.clone() });
        if std::mem::take(&mut self.subscription_lost) {
            info!(%user, "Reopening match channel");
            self.pending.push(Request::Subscribe { user });
        }
    }

    fn open_avatar(&mut self) {
        let avatar = self
            .swipe
            .as_ref()
            .and_then(|session| session.queue().front())
            .and_then(|dev| dev.avatar.clone());
        match avatar {
            Some(url) => self.pending.push(Request::OpenUrl { url }),
            None => {
                if self.swipe.as_ref().is_some_and(SwipeSession::can_decide) {
                    self.toasts.info("This developer has no avatar");
                }
            }
        }
    }

    /// Clear every persisted key and return to sign-in.
    pub fn logout(&mut self) {
        info!("Logging out");
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Could not clear session store");
            self.toasts.warning(AppError::from(e).user_message());
        }
        self.navigate(Route::Login);
    }

    /// Apply a result reported by a background task.
    pub fn handle_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::DevsLoaded { user, result } => self.on_devs_loaded(user, result),
            ApiMessage::DecisionRecorded {
                dev_id,
                decision,
                result,
            } => {
                if let Err(e) = result {
                    let e = AppError::from(e);
                    self.toasts.error(format!(
                        "Could not send {} for {}: {}",
                        decision,
                        dev_id,
                        e.user_message()
                    ));
                }
            }
            ApiMessage::Registered(result) => self.on_registered(result),
            ApiMessage::Realtime { user, event } => self.on_realtime(user, event),
        }
    }

    fn on_devs_loaded(&mut self, user: String, result: crate::api::error::Result<Vec<Dev>>) {
        let Some(session) = self.swipe.as_mut().filter(|s| s.identity() == user) else {
            debug!(%user, "Ignoring load for inactive identity");
            return;
        };
        self.spinner.stop();
        match result {
            Ok(devs) => {
                info!(count = devs.len(), "Candidates loaded");
                session.apply_loaded(devs);
            }
            Err(e) => {
                warn!(error = %e, "Loading candidates failed");
                let e = AppError::from(e);
                let message = match e.suggested_action() {
                    Some(action) => format!("{} {}", e.user_message(), action),
                    None => e.user_message(),
                };
                self.toasts.error(message);
            }
        }
    }

    fn on_registered(&mut self, result: crate::api::error::Result<Dev>) {
        if self.state != AppState::Login {
            debug!("Ignoring sign-in result outside the login screen");
            return;
        }
        self.spinner.stop();
        match result {
            Ok(dev) => {
                if let Err(e) = self.store.set(SESSION_USER_KEY, &dev.id) {
                    warn!(error = %e, "Could not persist session");
                    self.toasts
                        .warning("Signed in, but the session could not be saved");
                }
                self.toasts
                    .success(format!("Welcome, {}", dev.display_name()));
                self.navigate(Route::Main { user: dev.id });
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                self.login_view.set_error(AppError::from(e).user_message());
            }
        }
    }

    fn on_realtime(&mut self, user: String, event: RealtimeEvent) {
        let Some(session) = self.swipe.as_mut().filter(|s| s.identity() == user) else {
            debug!(%user, "Ignoring realtime event for inactive identity");
            return;
        };
        match event {
            RealtimeEvent::Connected => self.live = true,
            RealtimeEvent::Match(dev) => {
                session.apply_match(dev.clone());
                self.match_dialog.show(dev);
            }
            RealtimeEvent::Disconnected(reason) => {
                debug!(%reason, "Match channel down");
                // Retries repeat this event; only the drop itself is worth a toast.
                if std::mem::take(&mut self.live) {
                    self.toasts
                        .warning("Match notifications interrupted, reconnecting");
                }
            }
            RealtimeEvent::Error(reason) => {
                warn!(%reason, "Match channel error");
                self.toasts
                    .warning(format!("Match notifications: {}", reason));
            }
            RealtimeEvent::GaveUp(reason) => {
                self.live = false;
                self.subscription_lost = true;
                self.toasts.error(format!(
                    "Match notifications unavailable: {} Press 'r' to retry.",
                    reason
                ));
            }
        }
    }

    fn key_context(&self) -> KeyContext {
        if self.match_dialog.is_visible() {
            return KeyContext::MatchDialog;
        }
        match &self.swipe {
            Some(session) if self.state == AppState::Swipe => SwipeView::context(session),
            _ => KeyContext::Login,
        }
    }

    /// Render the application UI.
    pub fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header, content, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header);

        match (&self.swipe, self.state) {
            (Some(session), AppState::Swipe) => self.swipe_view.render(frame, content, session),
            _ => self.login_view.render(frame, content),
        }

        self.render_footer(frame, footer);
        self.toasts.render(frame, area);
        self.match_dialog.render(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("devswipe", Style::default().fg(Color::Cyan))];
        if let Some(user) = self.identity() {
            let (dot, color) = if self.live {
                ("●", Color::Green)
            } else {
                ("○", Color::DarkGray)
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(dot, Style::default().fg(color)));
            spans.push(Span::styled(
                format!(" {}", user),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let header = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(header, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let spinner = self.spinner.text();
        let [hints, busy] = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(spinner.chars().count() as u16),
        ])
        .areas(area);
        render_context_help(frame, hints, self.key_context());
        frame.render_widget(
            Paragraph::new(spinner).style(Style::default().fg(Color::Cyan)),
            busy,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::ui::SwipeContent;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session"));
        (App::new(&Config::default(), store), dir)
    }

    fn signed_in(user: &str, devs: Vec<Dev>) -> (App, TempDir) {
        let (mut app, dir) = create_test_app();
        app.navigate(Route::Main {
            user: user.to_string(),
        });
        app.take_requests();
        app.handle_message(ApiMessage::DevsLoaded {
            user: user.to_string(),
            result: Ok(devs),
        });
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn queue_ids(app: &App) -> Vec<String> {
        app.swipe()
            .map(|s| s.queue().iter().map(|d| d.id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_initial_route() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path());
        assert_eq!(Route::initial(None, &store), Route::Login);

        store.set(SESSION_USER_KEY, "u1").unwrap();
        assert_eq!(
            Route::initial(None, &store),
            Route::Main {
                user: "u1".to_string()
            }
        );
        assert_eq!(
            Route::initial(Some("u2".to_string()), &store),
            Route::Main {
                user: "u2".to_string()
            }
        );
        assert_eq!(
            Route::initial(Some(" ".to_string()), &store),
            Route::Main {
                user: "u1".to_string()
            }
        );
    }

    #[test]
    fn test_entering_main_loads_and_subscribes() {
        let (mut app, _dir) = create_test_app();
        app.navigate(Route::Main {
            user: "u1".to_string(),
        });

        assert_eq!(app.state(), AppState::Swipe);
        assert_eq!(
            app.take_requests(),
            vec![
                Request::LoadDevs {
                    user: "u1".to_string()
                },
                Request::Subscribe {
                    user: "u1".to_string()
                },
            ]
        );
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn test_loaded_single_card() {
        let (app, _dir) = signed_in(
            "u1",
            vec![Dev::new("a", "A").with_bio("x").with_avatar("url")],
        );

        assert_eq!(queue_ids(&app), vec!["a"]);
        let content = SwipeContent::from_session(app.swipe().unwrap(), usize::MAX);
        match content {
            SwipeContent::Cards(cards) => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].dev.name, "A");
            }
            SwipeContent::Empty => panic!("Expected one card"),
        }

        let text = screen(&app);
        assert!(!text.contains("Acabou :("));
        assert!(text.contains("url"));
        assert_eq!(text.matches('╭').count(), 1);
        assert!(text.lines().any(|line| line.contains("│A ")));
    }

    #[test]
    fn test_loaded_empty_queue() {
        let (app, _dir) = signed_in("u1", Vec::new());
        assert!(app.swipe().unwrap().queue().is_empty());
        let text = screen(&app);
        assert!(text.contains("Acabou :("));
        assert!(!text.contains("Dislike"));
    }

    #[test]
    fn test_like_removes_front_and_sends_one_request() {
        let (mut app, _dir) = signed_in(
            "u1",
            vec![Dev::new("a", "A"), Dev::new("b", "B"), Dev::new("c", "C")],
        );

        press(&mut app, KeyCode::Right);

        assert_eq!(queue_ids(&app), vec!["b", "c"]);
        assert_eq!(
            app.take_requests(),
            vec![Request::Decide {
                user: "u1".to_string(),
                dev_id: "a".to_string(),
                decision: Decision::Like,
            }]
        );
    }

    #[test]
    fn test_dislike_removes_front_and_sends_one_request() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A"), Dev::new("b", "B")]);

        press(&mut app, KeyCode::Char('-'));

        assert_eq!(queue_ids(&app), vec!["b"]);
        assert_eq!(
            app.take_requests(),
            vec![Request::Decide {
                user: "u1".to_string(),
                dev_id: "a".to_string(),
                decision: Decision::Dislike,
            }]
        );
    }

    #[test]
    fn test_decide_on_empty_queue_is_noop() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Left);
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn test_failed_decision_keeps_card_removed() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A"), Dev::new("b", "B")]);
        press(&mut app, KeyCode::Right);

        app.handle_message(ApiMessage::DecisionRecorded {
            dev_id: "a".to_string(),
            decision: Decision::Like,
            result: Err(ApiError::ServerError("boom".to_string())),
        });

        assert_eq!(queue_ids(&app), vec!["b"]);
        assert_eq!(app.toasts().len(), 1);
    }

    #[test]
    fn test_match_overwrites_and_leaves_queue() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A")]);

        for (id, name) in [("x", "X"), ("b", "B")] {
            app.handle_message(ApiMessage::Realtime {
                user: "u1".to_string(),
                event: RealtimeEvent::Match(Dev::new(id, name)),
            });
        }

        let session = app.swipe().unwrap();
        assert_eq!(session.current_match().map(|d| d.id.as_str()), Some("b"));
        assert_eq!(queue_ids(&app), vec!["a"]);
        assert!(app.match_dialog().is_visible());
    }

    #[test]
    fn test_match_dialog_blocks_swipes_until_dismissed() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A")]);
        app.handle_message(ApiMessage::Realtime {
            user: "u1".to_string(),
            event: RealtimeEvent::Match(Dev::new("b", "B")),
        });

        press(&mut app, KeyCode::Right);
        assert_eq!(queue_ids(&app), vec!["a"]);

        press(&mut app, KeyCode::Enter);
        assert!(!app.match_dialog().is_visible());
        // The match itself is kept.
        assert!(app.swipe().unwrap().current_match().is_some());
        assert!(screen(&app).contains("Last match: B"));
    }

    #[test]
    fn test_logout_clears_store_and_navigates() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A")]);
        app.store.set(SESSION_USER_KEY, "u1").unwrap();
        app.store.set("theme", "dark").unwrap();

        press(&mut app, KeyCode::Char('L'));

        assert_eq!(app.state(), AppState::Login);
        assert!(app.store.is_empty());
        assert!(app.swipe().is_none());
        assert_eq!(app.take_requests(), vec![Request::Unsubscribe]);
    }

    #[test]
    fn test_logout_with_empty_queue() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        app.logout();
        assert_eq!(app.state(), AppState::Login);
    }

    #[test]
    fn test_stale_identity_results_ignored() {
        let (mut app, _dir) = signed_in("u2", vec![Dev::new("a", "A")]);

        app.handle_message(ApiMessage::DevsLoaded {
            user: "u1".to_string(),
            result: Ok(vec![Dev::new("z", "Z")]),
        });
        app.handle_message(ApiMessage::Realtime {
            user: "u1".to_string(),
            event: RealtimeEvent::Match(Dev::new("z", "Z")),
        });

        assert_eq!(queue_ids(&app), vec!["a"]);
        assert!(app.swipe().unwrap().current_match().is_none());
    }

    #[test]
    fn test_load_failure_leaves_queue_and_toasts() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A")]);
        app.handle_message(ApiMessage::DevsLoaded {
            user: "u1".to_string(),
            result: Err(ApiError::RateLimited),
        });
        assert_eq!(queue_ids(&app), vec!["a"]);
        assert_eq!(app.toasts().len(), 1);
    }

    #[test]
    fn test_reload_requests_same_identity() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(
            app.take_requests(),
            vec![Request::LoadDevs {
                user: "u1".to_string()
            }]
        );
    }

    #[test]
    fn test_open_avatar_requests_url() {
        let (mut app, _dir) = signed_in("u1", vec![Dev::new("a", "A").with_avatar("https://x/a.png")]);
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(
            app.take_requests(),
            vec![Request::OpenUrl {
                url: "https://x/a.png".to_string()
            }]
        );
    }

    #[test]
    fn test_sign_in_flow_persists_user() {
        let (mut app, _dir) = create_test_app();
        for c in "octocat".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.take_requests(),
            vec![Request::Register {
                username: "octocat".to_string()
            }]
        );

        app.handle_message(ApiMessage::Registered(Ok(Dev::new("id-1", "Octo"))));

        assert_eq!(app.state(), AppState::Swipe);
        assert_eq!(app.identity(), Some("id-1"));
        assert_eq!(app.store.user(), Some("id-1".to_string()));
    }

    #[test]
    fn test_sign_in_failure_stays_on_login() {
        let (mut app, _dir) = create_test_app();
        app.handle_message(ApiMessage::Registered(Err(ApiError::NotFound(
            "octocat".to_string(),
        ))));
        assert_eq!(app.state(), AppState::Login);
        assert!(app.identity().is_none());
    }

    fn realtime(app: &mut App, event: RealtimeEvent) {
        app.handle_message(ApiMessage::Realtime {
            user: "u1".to_string(),
            event,
        });
    }

    #[test]
    fn test_realtime_status_tracking() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        realtime(&mut app, RealtimeEvent::Connected);
        assert!(app.is_live());

        realtime(&mut app, RealtimeEvent::Disconnected("closed".to_string()));
        assert!(!app.is_live());
        assert_eq!(app.toasts().len(), 1);

        // Failed retries while already down stay quiet.
        realtime(&mut app, RealtimeEvent::Disconnected("refused".to_string()));
        assert_eq!(app.toasts().len(), 1);
    }

    #[test]
    fn test_reload_reopens_lost_match_channel() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        realtime(&mut app, RealtimeEvent::GaveUp("bad url".to_string()));
        assert!(!app.is_live());

        app.reload();
        assert_eq!(
            app.take_requests(),
            vec![
                Request::LoadDevs {
                    user: "u1".to_string()
                },
                Request::Subscribe {
                    user: "u1".to_string()
                },
            ]
        );

        // Only once per loss.
        app.reload();
        assert_eq!(
            app.take_requests(),
            vec![Request::LoadDevs {
                user: "u1".to_string()
            }]
        );
    }

    #[test]
    fn test_channel_error_is_shown() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        realtime(&mut app, RealtimeEvent::Error("Not authorized".to_string()));
        assert_eq!(app.toasts().len(), 1);
        assert!(screen(&app).contains("Not authorized"));
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _dir) = signed_in("u1", Vec::new());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());

        let (mut app, _dir) = create_test_app();
        app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
        assert_eq!(app.state(), AppState::Exiting);
    }
}
