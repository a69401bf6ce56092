//! Application use cases
//!
//! - [`fan_out`] - concurrent queries to a set of models
//! - [`run_council`] - the three-stage council flow
//! - [`generate_title`] - conversation titles
//! - [`send_message`] - one council turn inside a stored conversation

pub mod fan_out;
pub mod generate_title;
pub mod run_council;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;
