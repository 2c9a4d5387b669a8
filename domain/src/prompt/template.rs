//! Built-in prompt templates for persona feedback

use crate::persona::PersonaId;

/// Templates and request framing for feedback prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// Default system prompt: describes the reviewer role and the JSON
    /// shape every persona must answer with.
    pub fn default_system() -> &'static str {
        r#"You are reviewing a business document on behalf of a specific audience.
Read the document carefully and respond ONLY with a JSON object of this shape:

{
  "comments": [
    { "text": "<comment>", "position": <character offset into the document>, "source_text": "<quoted excerpt>" }
  ],
  "scores": { "clarity": <0-100>, "tone": <0-100>, "impact": <0-100>, "actionability": <0-100> },
  "general_comments": ["<overall observation>"],
  "summary": "<two or three sentence summary of your feedback>"
}

Positions are counted in characters from the start of the document, with a
single character between paragraphs. Do not include any text outside the JSON."#
    }

    /// Default persona prompt
    pub fn default_persona(persona: PersonaId) -> &'static str {
        match persona {
            PersonaId::Management => {
                r#"Review as a senior manager. Focus on business value, strategic alignment,
cost and risk, and whether the decisions being asked for are clear."#
            }
            PersonaId::Technical => {
                r#"Review as a senior engineer. Focus on technical accuracy, feasibility,
missing implementation details and ambiguous requirements."#
            }
            PersonaId::Hr => {
                r#"Review as an HR partner. Focus on how the document affects people,
inclusive language, policy compliance and tone toward staff."#
            }
            PersonaId::Legal => {
                r#"Review as in-house counsel. Focus on commitments, liability, regulatory
exposure, confidentiality and statements that could be misread."#
            }
            PersonaId::Junior => {
                r#"Review as a new team member. Point out jargon, undefined acronyms,
assumed knowledge and anything that is hard to follow."#
            }
        }
    }

    /// Single-string framing for completion-style providers:
    /// system prompt, persona prompt, then the document as the user turn.
    pub fn completion_prompt(
        system_prompt: &str,
        persona_prompt: &str,
        document_text: &str,
    ) -> String {
        format!(
            "{}\n\n{}\n\nUser: {}\n\nAssistant:",
            system_prompt, persona_prompt, document_text
        )
    }
}
