mod action;
mod app;
mod auth;
mod client;
mod config;
mod detail;
mod error;
mod github;
mod list_machine;
mod tui;
mod types;
mod ui;
mod users;
mod web;

#[cfg(test)]
mod test_utils;

use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::client::DirectoryClient;
use crate::config::Config;
use crate::github::GitHub;
use crate::tui::{Event, EventHandler};

/// Browse GitHub users and their repositories from the terminal
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Config file to use instead of ~/.config/ghdir/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// API base URL (GitHub Enterprise, mirrors)
    #[arg(long)]
    api_url: Option<String>,
    /// Environment variable holding the API token
    #[arg(long)]
    token_env: Option<String>,
}

/// Logging stays off unless `GHDIR_LOG` names a file, since stderr would
/// draw over the terminal UI.
fn init_tracing() {
    let Some(log_path) = std::env::var("GHDIR_LOG").ok() else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&log_path) else {
        eprintln!("Warning: Failed to create log file: {}", log_path);
        return;
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let config = Config::load(cli.config.as_deref())
        .with_overrides(cli.api_url.as_deref(), cli.token_env.as_deref());
    let token = auth::load_token(&config.auth)?;

    let github = GitHub::new(&config.api.base_url, token)?;
    tracing::info!(base_url = %config.api.base_url, "starting");

    let result = run(Arc::new(github)).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(client: Arc<dyn DirectoryClient>) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(client, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
