//! # Bookdesk Entry Point
//!
//! Terminal front end for the library API. It loads the configuration, performs the
//! initial load, then reads commands from stdin and prints the view after each one.
//!
//! - First argument (optional): path to the configuration file (defaults to
//!   `config.json5` when present, built-in defaults otherwise)
//!
//! ```bash
//! cargo run
//! cargo run -- my-config.json5
//! ```
//!
//! Logs go to stderr; their level is controlled through the `RUST_LOG` environment
//! variable.

use bookdesk::app::LibraryApp;
use bookdesk::cli::{execute, interruptible, Command};
use bookdesk::config::Config;
use bookdesk::error::BookdeskError;
use bookdesk::render::render;
use bookdesk::view::with_view;
use std::env;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), BookdeskError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    let app = LibraryApp::from_config(&config)?;

    tracing::info!("Starting Bookdesk against {}", config.api_base);

    let cancel_token = CancellationToken::new();
    tokio::spawn({
        let cancel_token = cancel_token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupt received");
                cancel_token.cancel();
            }
        }
    });

    if interruptible(&cancel_token, app.initial_load()).await.is_none() {
        tracing::info!("Interrupted during initial load");
        return Ok(());
    }
    println!("{}", with_view(app.view(), |view| render(view)));
    println!("Type `help` for the list of commands.");

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    loop {
        let Some(Some(line)) = interruptible(&cancel_token, lines.next()).await else {
            break;
        };
        let line = line.map_err(|e| BookdeskError::Generic(format!("Failed to read input: {e}")))?;

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };

        // a command stuck on a slow request still yields to Ctrl-C
        match interruptible(&cancel_token, execute(&app, command)).await {
            Some(Some(output)) => print!("{output}"),
            _ => break,
        }
    }

    tracing::info!("Bookdesk shutting down");
    Ok(())
}
