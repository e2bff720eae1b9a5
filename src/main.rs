mod cli;
mod config;
mod db;
mod error;
mod models;

use clap::Parser;
use cli::{App, TerminalConsole};
use colored::*;
use config::{Cli, Settings};
use db::SqliteStore;
use error::Result;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Sets up `tracing`, to a file when one is configured and to stderr otherwise.
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_logging(settings: &Settings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match &settings.log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "quiz.log".into());
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        },
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_cli(Cli::parse());
    let _log_guard = init_logging(&settings);

    info!("Initializing quiz trainer...");

    let store = match SqliteStore::new(&settings.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open the quiz store: {:?}", e);
            println!(
                "{}",
                "Error: Failed to open the quiz database. Check logs.".red()
            );
            return Err(e);
        },
    };
    store.init_schema().await?;

    let seeded = store.seed_if_empty(&settings.seed.quizzes()?).await?;
    if seeded > 0 {
        info!("Store was empty, added {} quizzes", seeded);
    }

    println!("{}", "Welcome to the quiz trainer!".cyan().bold());
    println!("Type {} to see the available commands.", "help".cyan());

    let mut app = App::new(store, TerminalConsole::new());
    app.run().await;

    println!("{}", "Bye!".green());
    Ok(())
}
