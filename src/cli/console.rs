//! The seam between commands and the terminal.
//!
//! Commands never print directly: they ask for input through [`Console::ask`], describe what
//! happened as an [`Event`], and signal the end of every command with [`Console::ready`].

use crate::error::{AppError, Result};
use crate::models::Quiz;
use async_trait::async_trait;
use colored::*;
use comfy_table::Table;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

/// Command summary printed by `help`.
pub const HELP: [(&str, &str); 10] = [
    ("h|help", "Show this help."),
    ("list", "List the stored quizzes."),
    ("show <id>", "Show the question and answer of a quiz."),
    ("add", "Add a new quiz interactively."),
    ("delete <id>", "Delete a quiz."),
    ("edit <id>", "Edit a quiz."),
    ("test <id>", "Answer a single quiz."),
    ("p|play", "Answer every quiz in random order."),
    ("credits", "Credits."),
    ("q|quit", "Leave the program."),
];

/// Something a command wants the user to see.
#[derive(Debug, Clone)]
pub enum Event {
    Help,
    Credits,
    Listed(Vec<Quiz>),
    Shown(Quiz),
    Added(Quiz),
    Edited(Quiz),
    Deleted(i64),
    /// Result of a single `test`.
    Verdict { correct: bool },
    /// Score so far, after a correct answer during `play`.
    RunningScore(u32),
    /// A `play` question was answered incorrectly.
    WrongAnswer,
    /// `play` started on an empty store.
    NothingToAsk,
    /// Every quiz of the `play` session has been asked.
    NothingLeft,
    GameOver { score: u32 },
    Failed(AppError),
    UnknownCommand(String),
}

/// Line input, output and the end-of-command signal.
#[async_trait]
pub trait Console: Send {
    /// Shows `text` and waits for one line, returned trimmed.
    ///
    /// `prefill` seeds the input buffer when the terminal supports it and is ignored otherwise.
    async fn ask(&mut self, text: &str, prefill: Option<&str>) -> Result<String>;

    /// Presents an event to the user.
    fn report(&mut self, event: Event);

    /// The current command is finished; the console is ready for the next one.
    fn ready(&mut self);
}

/// `Console` backed by the process's terminal.
///
/// Uses `dialoguer` for line editing when stdin and stdout are terminals, and plain
/// line reads from stdin otherwise (piped scripts).
pub struct TerminalConsole {
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn ask(&mut self, text: &str, prefill: Option<&str>) -> Result<String> {
        let text = text.to_string();
        let reply = if self.interactive {
            let initial = prefill.map(str::to_string);
            tokio::task::spawn_blocking(move || -> Result<String> {
                let theme = ColorfulTheme::default();
                let mut input = Input::<String>::with_theme(&theme)
                    .with_prompt(text)
                    .allow_empty(true);
                if let Some(initial) = initial {
                    input = input.with_initial_text(initial);
                }
                Ok(input.interact_text()?)
            })
            .await
            .map_err(|e| AppError::InputClosed(e.to_string()))??
        } else {
            tokio::task::spawn_blocking(move || -> Result<String> {
                // Prompt texts carry no separator; dialoguer's theme adds its own.
                print!("{}{} ", text.green(), ":".green());
                io::stdout().flush()?;
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Err(AppError::InputClosed("end of input".to_string()));
                }
                Ok(line)
            })
            .await
            .map_err(|e| AppError::InputClosed(e.to_string()))??
        };

        Ok(reply.trim().to_string())
    }

    fn report(&mut self, event: Event) {
        match event {
            Event::Help => {
                println!("{}", "Commands:".bold());
                for (usage, description) in HELP {
                    println!("  {} - {}", usage.cyan(), description);
                }
            },
            Event::Credits => {
                println!("Quiz trainer authors:");
                println!("{}", "The quiz-trainer developers".green());
            },
            Event::Listed(quizzes) => {
                if quizzes.is_empty() {
                    println!("{}", "No quizzes stored yet.".yellow());
                } else {
                    let mut table = Table::new();
                    table.set_header(vec!["Id", "Question"]);
                    for quiz in quizzes {
                        table.add_row(vec![quiz.id.to_string(), quiz.question]);
                    }
                    println!("{table}");
                }
            },
            Event::Shown(quiz) => println!("{}", describe(&quiz)),
            Event::Added(quiz) => println!("{} {}", "Added".magenta(), describe(&quiz)),
            Event::Edited(quiz) => println!("{} {}", "Changed".magenta(), describe(&quiz)),
            Event::Deleted(id) => println!("{} {}", "Deleted".magenta(), id),
            Event::Verdict { correct: true } => {
                println!("{}", "Your answer is correct.".green());
                println!("{}", "CORRECT".green().bold());
            },
            Event::Verdict { correct: false } => {
                println!("{}", "Your answer is incorrect.".red());
                println!("{}", "INCORRECT".red().bold());
            },
            Event::RunningScore(score) => {
                println!("Correct answers: {}", score.to_string().green());
            },
            Event::WrongAnswer => println!("{}", "Wrong answer.".red().bold()),
            Event::NothingToAsk => println!("{}", "There are no quizzes to ask.".yellow()),
            Event::NothingLeft => println!("{}", "Nothing left to ask.".cyan()),
            Event::GameOver { score } => {
                println!("{} {}", "Game over. Correct answers:".bold(), score.to_string().magenta().bold());
            },
            Event::Failed(err) => {
                for line in err.render_lines() {
                    eprintln!("{} {}", "Error:".red(), line.red());
                }
            },
            Event::UnknownCommand(word) => {
                eprintln!("{} {}", "Unknown command:".red(), word);
                println!("Use {} to see every command.", "help".cyan());
            },
        }
    }

    fn ready(&mut self) {
        if let Err(e) = io::stdout().flush() {
            debug!("Failed to flush stdout: {}", e);
        }
        debug!("Ready for the next command");
    }
}

fn describe(quiz: &Quiz) -> String {
    format!(
        "[{}]: {} {} {}",
        quiz.id.to_string().magenta(),
        quiz.question,
        "=>".magenta(),
        quiz.answer
    )
}
