//! Prompt resolution from built-ins, a prompt directory and config overrides

use crate::config::FilePromptsConfig;
use sideview_domain::{PersonaId, PromptConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File holding the system prompt inside a prompt directory
pub const SYSTEM_PROMPT_FILE: &str = "systemPrompt.txt";

#[derive(Error, Debug)]
pub enum PromptStoreError {
    #[error("Cannot read prompt directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads [`PromptConfig`] in three layers, later layers winning:
///
/// 1. Built-in prompts
/// 2. `<dir>/systemPrompt.txt` and `<dir>/<persona>.txt`
/// 3. Inline `[prompts]` overrides
pub struct FilePromptStore {
    dir: Option<PathBuf>,
}

impl FilePromptStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// File name for a persona's prompt, e.g. `management.txt`
    pub fn persona_file(persona: PersonaId) -> String {
        format!("{}.txt", persona.as_str())
    }

    /// Resolve prompts, applying inline overrides from config.
    ///
    /// A missing or unreadable prompt file keeps the built-in prompt with a
    /// warning. A directory that cannot be listed is an error.
    pub async fn load(
        &self,
        overrides: &FilePromptsConfig,
    ) -> Result<PromptConfig, PromptStoreError> {
        let mut prompts = PromptConfig::builtin();

        if let Some(dir) = &self.dir {
            Self::check_dir(dir).await?;

            if let Some(system) = Self::read_prompt(&dir.join(SYSTEM_PROMPT_FILE)).await {
                prompts.system_prompt = system;
            }
            for persona in PersonaId::ALL {
                let path = dir.join(Self::persona_file(persona));
                if let Some(text) = Self::read_prompt(&path).await {
                    prompts.set_persona_prompt(persona, text);
                }
            }
        }

        if let Some(system) = &overrides.system {
            prompts.system_prompt = system.clone();
        }
        for persona in PersonaId::ALL {
            if let Some(text) = overrides.persona_override(persona) {
                prompts.set_persona_prompt(persona, text);
            }
        }

        Ok(prompts)
    }

    async fn check_dir(dir: &Path) -> Result<(), PromptStoreError> {
        tokio::fs::read_dir(dir)
            .await
            .map(|_| ())
            .map_err(|source| PromptStoreError::Directory {
                path: dir.to_path_buf(),
                source,
            })
    }

    async fn read_prompt(path: &Path) -> Option<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                debug!("Loaded prompt {}", path.display());
                Some(text.trim().to_string())
            }
            Err(e) => {
                warn!(
                    "Could not read prompt {}, using built-in: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}
