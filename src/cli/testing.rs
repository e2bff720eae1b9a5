//! In-memory store and scripted console for command tests.

use super::commands::App;
use super::console::{Console, Event};
use crate::db::QuizStore;
use crate::error::{AppError, Result};
use crate::models::{NewQuiz, Quiz};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

pub fn app_with(store: MockStore, console: ScriptedConsole) -> App<MockStore, ScriptedConsole> {
    App::with_rng(store, console, StdRng::seed_from_u64(42))
}

#[derive(Default)]
struct MockStoreState {
    quizzes: BTreeMap<i64, Quiz>,
    next_id: i64,
    calls: Vec<String>,
    fail_next: Option<AppError>,
}

/// Store double that records every call and can be told to fail the next one.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockStoreState>,
}

impl MockStore {
    pub fn with_quizzes(pairs: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (question, answer) in pairs {
                state.next_id += 1;
                let id = state.next_id;
                state.quizzes.insert(id, make_quiz(id, question, answer));
            }
        }
        store
    }

    pub fn fail_next(&self, err: AppError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().quizzes.len()
    }

    pub fn get(&self, id: i64) -> Option<Quiz> {
        self.state.lock().unwrap().quizzes.get(&id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Quiz> {
        self.state.lock().unwrap().quizzes.values().cloned().collect()
    }

    fn enter(&self, call: &str) -> Result<std::sync::MutexGuard<'_, MockStoreState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn make_quiz(id: i64, question: &str, answer: &str) -> Quiz {
    let now = Utc::now();
    Quiz {
        id,
        question: question.to_string(),
        answer: answer.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl QuizStore for MockStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Quiz>> {
        let state = self.enter("find_by_id")?;
        Ok(state.quizzes.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Quiz>> {
        let state = self.enter("list_all")?;
        Ok(state.quizzes.values().cloned().collect())
    }

    async fn list_ids(&self) -> Result<Vec<i64>> {
        let state = self.enter("list_ids")?;
        Ok(state.quizzes.keys().copied().collect())
    }

    async fn create(&self, quiz: NewQuiz) -> Result<Quiz> {
        let mut state = self.enter("create")?;
        quiz.validate()?;
        state.next_id += 1;
        let created = make_quiz(state.next_id, &quiz.question, &quiz.answer);
        state.quizzes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, quiz: &Quiz) -> Result<Quiz> {
        let mut state = self.enter("update")?;
        quiz.validate()?;
        match state.quizzes.get_mut(&quiz.id) {
            Some(stored) => {
                *stored = quiz.clone();
                Ok(quiz.clone())
            },
            None => Err(AppError::NotFound(quiz.id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let mut state = self.enter("delete_by_id")?;
        Ok(u64::from(state.quizzes.remove(&id).is_some()))
    }
}

/// Console double: replays scripted replies and records everything it is shown.
///
/// Running out of replies behaves like a closed input channel.
#[derive(Default)]
pub struct ScriptedConsole {
    replies: VecDeque<String>,
    by_prompt: HashMap<String, String>,
    fail_next: Option<AppError>,
    pub prompts: Vec<String>,
    pub prefills: Vec<Option<String>>,
    pub events: Vec<Event>,
    pub ready_count: usize,
}

impl ScriptedConsole {
    /// Replies are returned in order, whatever the prompt.
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Replies are chosen by the prompt text.
    pub fn answering(pairs: &[(&str, &str)]) -> Self {
        Self {
            by_prompt: pairs
                .iter()
                .map(|(prompt, reply)| (prompt.to_string(), reply.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// The next `ask` fails with `err` instead of replying.
    pub fn fail_next(&mut self, err: AppError) {
        self.fail_next = Some(err);
    }

    pub fn failures(&self) -> Vec<AppError> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Failed(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn ask(&mut self, text: &str, prefill: Option<&str>) -> Result<String> {
        self.prompts.push(text.to_string());
        self.prefills.push(prefill.map(str::to_string));
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }

        let reply = match self.by_prompt.get(text) {
            Some(reply) => Some(reply.clone()),
            None => self.replies.pop_front(),
        };
        reply
            .map(|r| r.trim().to_string())
            .ok_or_else(|| AppError::InputClosed("script exhausted".to_string()))
    }

    fn report(&mut self, event: Event) {
        self.events.push(event);
    }

    fn ready(&mut self) {
        self.ready_count += 1;
    }
}
