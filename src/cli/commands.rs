use super::console::{Console, Event};
use super::validate::parse_id;
use crate::db::QuizStore;
use crate::error::{AppError, Result};
use crate::models::NewQuiz;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

/// Text shown when waiting for the next command.
pub const COMMAND_PROMPT: &str = "quiz";

/// One line of user input, parsed into a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show(Option<String>),
    Add,
    Delete(Option<String>),
    Edit(Option<String>),
    Test(Option<String>),
    Play,
    Credits,
    Quit,
    /// A blank line.
    Empty,
    Unknown(String),
}

impl Command {
    /// Splits a line on whitespace; the first word (case-insensitive) selects the command
    /// and the second, if any, is the raw `<id>` argument.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Command::Empty;
        };
        let arg = words.next().map(str::to_string);

        match word.to_lowercase().as_str() {
            "h" | "help" => Command::Help,
            "list" => Command::List,
            "show" => Command::Show(arg),
            "add" => Command::Add,
            "delete" => Command::Delete(arg),
            "edit" => Command::Edit(arg),
            "test" => Command::Test(arg),
            "p" | "play" => Command::Play,
            "credits" => Command::Credits,
            "q" | "quit" => Command::Quit,
            _ => Command::Unknown(word.to_string()),
        }
    }
}

/// What the input loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// CLI application: a store, a console, and the randomness used by `play`.
pub struct App<S, C> {
    pub(super) store: S,
    pub(super) console: C,
    pub(super) rng: StdRng,
}

impl<S: QuizStore, C: Console> App<S, C> {
    /// Create a new CLI application
    pub fn new(store: S, console: C) -> Self {
        Self::with_rng(store, console, StdRng::from_entropy())
    }

    pub fn with_rng(store: S, console: C, rng: StdRng) -> Self {
        Self {
            store,
            console,
            rng,
        }
    }

    /// Reads and runs commands until `quit` or until the input channel is lost.
    ///
    /// A failed read follows the same rule as a failed command: it is reported and
    /// finalized, and only the loss of the input channel ends the loop.
    pub async fn run(&mut self) {
        loop {
            let line = match self.console.ask(COMMAND_PROMPT, None).await {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to read the next command: {:?}", e);
                    let fatal = e.is_fatal();
                    self.console.report(Event::Failed(e));
                    self.console.ready();
                    if fatal {
                        info!("Input closed, leaving the input loop");
                        return;
                    }
                    continue;
                },
            };

            if self.execute(Command::parse(&line)).await == Flow::Quit {
                info!("Leaving the input loop");
                return;
            }
        }
    }

    /// Runs one command to completion.
    ///
    /// Any failure is reported here and never escapes. Except for `quit`, the console's
    /// `ready` signal fires exactly once per call, on success and on failure alike.
    pub async fn execute(&mut self, command: Command) -> Flow {
        if command == Command::Quit {
            return Flow::Quit;
        }

        let flow = match self.dispatch(command).await {
            Ok(outcome) => {
                info!("Command finished: {}", outcome);
                Flow::Continue
            },
            Err(e) => {
                error!("Command execution failed: {:?}", e);
                let fatal = e.is_fatal();
                self.console.report(Event::Failed(e));
                if fatal {
                    Flow::Quit
                } else {
                    Flow::Continue
                }
            },
        };

        self.console.ready();
        flow
    }

    /// Runs the stages of a command, returning a description of the work performed.
    async fn dispatch(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Help => {
                self.console.report(Event::Help);
                Ok("help shown".to_string())
            },
            Command::Credits => {
                self.console.report(Event::Credits);
                Ok("credits shown".to_string())
            },
            Command::List => self.list().await,
            Command::Show(id) => self.show(id.as_deref()).await,
            Command::Add => self.add().await,
            Command::Delete(id) => self.delete(id.as_deref()).await,
            Command::Edit(id) => self.edit(id.as_deref()).await,
            Command::Test(id) => self.test(id.as_deref()).await,
            Command::Play => self.play().await,
            Command::Empty => Ok("nothing to do".to_string()),
            Command::Unknown(word) => {
                self.console.report(Event::UnknownCommand(word.clone()));
                Ok(format!("unknown command {:?}", word))
            },
            Command::Quit => Ok("quit".to_string()),
        }
    }

    async fn list(&mut self) -> Result<String> {
        let quizzes = self.store.list_all().await?;
        let count = quizzes.len();
        self.console.report(Event::Listed(quizzes));
        Ok(format!("listed {} quizzes", count))
    }

    async fn show(&mut self, raw_id: Option<&str>) -> Result<String> {
        let id = parse_id(raw_id)?;
        let quiz = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;
        self.console.report(Event::Shown(quiz));
        Ok(format!("showed quiz {}", id))
    }

    async fn add(&mut self) -> Result<String> {
        let question = self.console.ask("Enter a question", None).await?;
        let answer = self.console.ask("Enter the answer", None).await?;

        let quiz = self.store.create(NewQuiz::new(question, answer)).await?;
        let id = quiz.id;
        self.console.report(Event::Added(quiz));
        Ok(format!("added quiz {}", id))
    }

    async fn delete(&mut self, raw_id: Option<&str>) -> Result<String> {
        let id = parse_id(raw_id)?;
        if self.store.delete_by_id(id).await? > 0 {
            self.console.report(Event::Deleted(id));
            Ok(format!("deleted quiz {}", id))
        } else {
            debug!("No quiz {} to delete", id);
            Ok(format!("quiz {} was already absent", id))
        }
    }

    async fn edit(&mut self, raw_id: Option<&str>) -> Result<String> {
        let id = parse_id(raw_id)?;
        let mut quiz = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;

        let question = self
            .console
            .ask("Enter the question", Some(&quiz.question))
            .await?;
        let answer = self
            .console
            .ask("Enter the answer", Some(&quiz.answer))
            .await?;
        quiz.question = question;
        quiz.answer = answer;

        let quiz = self.store.update(&quiz).await?;
        self.console.report(Event::Edited(quiz));
        Ok(format!("edited quiz {}", id))
    }

    async fn test(&mut self, raw_id: Option<&str>) -> Result<String> {
        let id = parse_id(raw_id)?;
        let quiz = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;

        let reply = self.console.ask(&quiz.question, None).await?;
        let correct = quiz.is_correct(&reply);
        self.console.report(Event::Verdict { correct });
        Ok(format!("tested quiz {} (correct: {})", id, correct))
    }
}
