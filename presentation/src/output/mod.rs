//! Output rendering: console text, JSON and streamed events

pub mod console;
pub mod formatter;
pub mod sse;
