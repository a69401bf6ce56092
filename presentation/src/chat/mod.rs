//! Interactive chat module
//!
//! Provides a reedline-based interactive chat interface. Every line is a
//! message in one stored conversation.

mod repl;

pub use repl::{ChatRepl, ReplCommand, ReplError, parse_command};
