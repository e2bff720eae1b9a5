//! Defines the data structures used throughout the application.
//!
//! The store owns `Quiz` records; `NewQuiz` is what commands and seed files hand to it.

mod quiz;

pub use quiz::*;
