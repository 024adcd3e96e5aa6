//! devswipe - swipe through developer profiles from the terminal.

use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{error, info};

use devswipe::api::DevsClient;
use devswipe::app::{App, Route};
use devswipe::config::Config;
use devswipe::error::AppError;
use devswipe::events::EventHandler;
use devswipe::logging;
use devswipe::session::SessionStore;
use devswipe::tasks::{ApiMessage, TaskRunner, TaskSpawner};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Command-line options. Flags win over the environment and the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "devswipe", version, about)]
struct Cli {
    /// Skip sign-in and swipe as this user id
    #[arg(short, long)]
    user: Option<String>,

    /// Matching service base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Socket.IO server base URL
    #[arg(long)]
    realtime_url: Option<String>,

    /// Use this config file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    fn config_path(&self) -> devswipe::config::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_path(),
        }
    }

    /// Load the file, then layer the environment and these flags on top.
    fn resolve_config(&self) -> devswipe::error::Result<Config> {
        let mut config = Config::load_from(&self.config_path()?)?;
        config.apply_env_overrides();
        if let Some(url) = &self.api_url {
            config.server.api_url = url.clone();
        }
        if let Some(url) = &self.realtime_url {
            config.server.realtime_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn describe(err: &AppError) -> String {
    match err.suggested_action() {
        Some(action) => format!("{}\n{}", err.user_message(), action),
        None => err.user_message(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let config = cli
        .resolve_config()
        .map_err(|e| anyhow::anyhow!(describe(&e)))?;

    if cli.init_config {
        let path = cli.config_path()?;
        config.save_to(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let store = SessionStore::open().context("Could not open the session store")?;
    let client = DevsClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!(describe(&AppError::from(e))))?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut runner = TaskRunner::new(TaskSpawner::new(tx), client, &config);

    let route = Route::initial(cli.user.clone(), &store);
    let mut app = App::new(&config, store);
    app.navigate(route);

    install_panic_hook();
    let mut terminal = setup_terminal().context("Could not initialize the terminal")?;
    let events = EventHandler::with_tick_rate(config.settings.tick_rate_ms);

    let result = run(&mut terminal, &mut app, &mut runner, rx, &events);

    restore_terminal(&mut terminal)?;
    if let Err(e) = &result {
        error!(error = %e, "Exited with error");
    }
    logging::shutdown();
    result
}

/// Draw, read input, apply background results, dispatch new work. Repeat.
fn run(
    terminal: &mut Tui,
    app: &mut App,
    runner: &mut TaskRunner,
    mut rx: mpsc::UnboundedReceiver<ApiMessage>,
    events: &EventHandler,
) -> anyhow::Result<()> {
    info!("Entering main loop");
    while !app.should_quit() {
        for request in app.take_requests() {
            runner.dispatch(request);
        }

        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);

        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }
    }
    // Close the match channel before the runtime shuts down.
    for request in app.take_requests() {
        runner.dispatch(request);
    }
    Ok(())
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Leave the alternate screen before the panic message is printed.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}
