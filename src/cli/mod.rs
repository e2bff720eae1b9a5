//! Handles the interactive command line.
//!
//! Includes parsing input lines into commands, the uniform command lifecycle
//! (run, report failures, signal readiness), the single-quiz commands, the `play`
//! session, and the terminal-backed console.

mod commands;
mod console;
mod play;
mod validate;

#[cfg(test)]
mod testing;

pub use commands::*;
pub use console::*;
