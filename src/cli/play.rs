//! The `play` command: every stored quiz, asked once each in random order, until one is
//! answered wrongly or none are left.

use super::commands::App;
use super::console::{Console, Event};
use crate::db::QuizStore;
use crate::error::Result;
use crate::models::Quiz;
use rand::Rng;
use tracing::{debug, info, warn};

/// Ids still to be asked and the number of correct answers so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaySession {
    remaining: Vec<i64>,
    score: u32,
}

impl PlaySession {
    /// Starts a session over a snapshot of ids; later store changes are not seen.
    pub fn new(ids: Vec<i64>) -> Self {
        Self {
            remaining: ids,
            score: 0,
        }
    }

    /// Draws one of the remaining ids uniformly at random and removes it.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<i64> {
        if self.remaining.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(index))
    }

    pub fn record_correct(&mut self) -> u32 {
        self.score += 1;
        self.score
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The store had no quizzes when the session started.
    Empty,
    /// Every quiz was answered correctly.
    Exhausted,
    /// A quiz was answered incorrectly.
    Missed,
}

enum PlayState {
    Ready,
    AwaitingAnswer(Quiz),
    Scoring { quiz: Quiz, reply: String },
    Finished(Ending),
}

impl<S: QuizStore, C: Console> App<S, C> {
    /// Runs a full `play` session and reports its final score.
    pub(super) async fn play(&mut self) -> Result<String> {
        let ids = self.store.list_ids().await?;
        info!("Starting play session over {} quizzes", ids.len());
        let total = ids.len();
        let mut session = PlaySession::new(ids);

        let mut state = if total == 0 {
            PlayState::Finished(Ending::Empty)
        } else {
            PlayState::Ready
        };

        let ending = loop {
            state = match state {
                PlayState::Ready => match session.draw(&mut self.rng) {
                    None => {
                        self.console.report(Event::NothingLeft);
                        PlayState::Finished(Ending::Exhausted)
                    },
                    Some(id) => match self.store.find_by_id(id).await? {
                        Some(quiz) => PlayState::AwaitingAnswer(quiz),
                        None => {
                            warn!("Quiz {} disappeared during the session, skipping it", id);
                            PlayState::Ready
                        },
                    },
                },
                PlayState::AwaitingAnswer(quiz) => {
                    let reply = self.console.ask(&quiz.question, None).await?;
                    PlayState::Scoring { quiz, reply }
                },
                PlayState::Scoring { quiz, reply } => {
                    if quiz.is_correct(&reply) {
                        let score = session.record_correct();
                        debug!("Quiz {} answered correctly, score {}", quiz.id, score);
                        self.console.report(Event::RunningScore(score));
                        PlayState::Ready
                    } else {
                        debug!("Quiz {} answered incorrectly", quiz.id);
                        self.console.report(Event::WrongAnswer);
                        PlayState::Finished(Ending::Missed)
                    }
                },
                PlayState::Finished(ending) => break ending,
            };
        };

        let score = session.score();
        match ending {
            Ending::Empty => self.console.report(Event::NothingToAsk),
            Ending::Exhausted | Ending::Missed => self.console.report(Event::GameOver { score }),
        }

        Ok(format!(
            "play finished ({:?}) with score {}/{}",
            ending, score, total
        ))
    }
}
