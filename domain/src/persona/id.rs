//! Persona identifier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A reviewing viewpoint (Value Object)
///
/// The set is closed and its declaration order is the processing order
/// used by every analysis run. `Ord` follows that order, so ordered maps
/// keyed by `PersonaId` iterate personas in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    Management,
    Technical,
    Hr,
    Legal,
    Junior,
}

impl PersonaId {
    /// All personas in processing order
    pub const ALL: [PersonaId; 5] = [
        PersonaId::Management,
        PersonaId::Technical,
        PersonaId::Hr,
        PersonaId::Legal,
        PersonaId::Junior,
    ];

    /// Get the string identifier for this persona
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaId::Management => "management",
            PersonaId::Technical => "technical",
            PersonaId::Hr => "hr",
            PersonaId::Legal => "legal",
            PersonaId::Junior => "junior",
        }
    }

    /// Number of personas in the closed set
    pub fn count() -> usize {
        Self::ALL.len()
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PersonaId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "management" => Ok(PersonaId::Management),
            "technical" => Ok(PersonaId::Technical),
            "hr" => Ok(PersonaId::Hr),
            "legal" => Ok(PersonaId::Legal),
            "junior" => Ok(PersonaId::Junior),
            other => Err(DomainError::UnknownPersona(other.to_string())),
        }
    }
}
