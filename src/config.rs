//! Process-level configuration.
//!
//! Command line flags (`clap`) take precedence over environment variables, which are
//! loaded from a `.env` file first when one is present (`dotenv`).

use crate::error::Result;
use crate::models::{default_quizzes, load_seed_file, NewQuiz};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Database used when neither the flag nor `QUIZ_DATABASE_URL` is set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:quizzes.sqlite?mode=rwc";

/// Interactive quiz trainer
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite connection string (default: $QUIZ_DATABASE_URL or a local quizzes.sqlite)
    #[arg(long)]
    pub database_url: Option<String>,

    /// JSON file with `[{"question": ..., "answer": ...}]` used to seed an empty store
    #[arg(long)]
    pub seed_file: Option<PathBuf>,

    /// Never seed the store, even when it is empty
    #[arg(long)]
    pub no_seed: bool,

    /// Write logs to this file instead of stderr (default: $QUIZ_LOG_FILE)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// How an empty store gets populated at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    None,
    Defaults,
    File(PathBuf),
}

impl Seed {
    /// The quizzes to insert into an empty store.
    pub fn quizzes(&self) -> Result<Vec<NewQuiz>> {
        match self {
            Seed::None => Ok(Vec::new()),
            Seed::Defaults => Ok(default_quizzes()),
            Seed::File(path) => load_seed_file(path),
        }
    }
}

/// Resolved settings for one run of the trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub seed: Seed,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Merges command line flags with the process environment.
    pub fn from_cli(cli: Cli) -> Self {
        dotenv::dotenv().ok();
        Self::resolve(cli, |key| env::var(key).ok())
    }

    fn resolve(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = cli
            .database_url
            .or_else(|| lookup("QUIZ_DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let seed = match (cli.no_seed, cli.seed_file) {
            (true, _) => Seed::None,
            (false, Some(path)) => Seed::File(path),
            (false, None) => Seed::Defaults,
        };

        let log_file = cli
            .log_file
            .or_else(|| lookup("QUIZ_LOG_FILE").map(PathBuf::from));

        let settings = Self {
            database_url,
            seed,
            log_file,
        };
        debug!("Resolved settings: {:?}", settings);
        settings
    }
}
