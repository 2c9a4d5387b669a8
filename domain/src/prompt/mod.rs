//! Prompt domain
//!
//! Prompt configuration for a run and the built-in default templates.

mod config;
mod template;

pub use config::PromptConfig;
pub use template::PromptTemplate;
