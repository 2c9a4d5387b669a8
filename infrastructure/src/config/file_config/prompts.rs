//! Prompt configuration from TOML (`[prompts]` section)

use serde::{Deserialize, Serialize};
use sideview_domain::PersonaId;
use std::path::PathBuf;

/// Prompt sources
///
/// # Example
///
/// ```toml
/// [prompts]
/// dir = "prompts"              # systemPrompt.txt, management.txt, ...
/// legal = "Review as a contracts lawyer."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    /// Directory of prompt text files
    pub dir: Option<PathBuf>,
    /// Inline system prompt, overrides the directory
    pub system: Option<String>,
    pub management: Option<String>,
    pub technical: Option<String>,
    pub hr: Option<String>,
    pub legal: Option<String>,
    pub junior: Option<String>,
}

impl FilePromptsConfig {
    /// Inline override for a persona, if configured
    pub fn persona_override(&self, persona: PersonaId) -> Option<&str> {
        match persona {
            PersonaId::Management => self.management.as_deref(),
            PersonaId::Technical => self.technical.as_deref(),
            PersonaId::Hr => self.hr.as_deref(),
            PersonaId::Legal => self.legal.as_deref(),
            PersonaId::Junior => self.junior.as_deref(),
        }
    }
}
