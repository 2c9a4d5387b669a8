//! Prompt loading

mod store;

pub use store::{FilePromptStore, PromptStoreError, SYSTEM_PROMPT_FILE};
