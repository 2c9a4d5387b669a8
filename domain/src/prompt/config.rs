//! Prompt configuration for an analysis run

use super::template::PromptTemplate;
use crate::persona::PersonaId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// System prompt plus one prompt per persona
///
/// Empty prompts are valid; they only make the request weaker. A persona
/// with no entry behaves as if its prompt were empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub system_prompt: String,
    #[serde(default)]
    pub persona_prompts: BTreeMap<PersonaId, String>,
}

impl PromptConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            persona_prompts: BTreeMap::new(),
        }
    }

    /// The built-in prompts for every persona
    pub fn builtin() -> Self {
        PersonaId::ALL.into_iter().fold(
            Self::new(PromptTemplate::default_system()),
            |config, persona| {
                config.with_persona_prompt(persona, PromptTemplate::default_persona(persona))
            },
        )
    }

    pub fn with_persona_prompt(mut self, persona: PersonaId, prompt: impl Into<String>) -> Self {
        self.persona_prompts.insert(persona, prompt.into());
        self
    }

    pub fn set_persona_prompt(&mut self, persona: PersonaId, prompt: impl Into<String>) {
        self.persona_prompts.insert(persona, prompt.into());
    }

    /// Prompt for `persona`, or `""` if none is configured
    pub fn persona_prompt(&self, persona: PersonaId) -> &str {
        self.persona_prompts
            .get(&persona)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_persona_prompt_is_empty() {
        let config = PromptConfig::new("system");
        assert_eq!(config.persona_prompt(PersonaId::Legal), "");
    }

    #[test]
    fn test_builtin_covers_all_personas() {
        let config = PromptConfig::builtin();
        assert!(!config.system_prompt.is_empty());
        for persona in PersonaId::ALL {
            assert_eq!(
                config.persona_prompt(persona),
                PromptTemplate::default_persona(persona)
            );
        }
    }

    #[test]
    fn test_deserialize_keyed_by_persona_id() {
        let json = r#"{ "system_prompt": "S", "persona_prompts": { "hr": "be kind" } }"#;
        let config: PromptConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.persona_prompt(PersonaId::Hr), "be kind");
        assert_eq!(config.persona_prompt(PersonaId::Junior), "");
    }
}
