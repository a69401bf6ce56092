//! Prompt domain
//!
//! Templates for generating the prompts of each council stage.

mod template;

pub use template::PromptTemplate;
