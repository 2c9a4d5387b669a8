//! Static persona registry

use super::id::PersonaId;
use serde::Serialize;

/// Display metadata for a persona
///
/// The orchestrator only forwards these values to the document adapter
/// (comment author and color); it never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaInfo {
    pub id: PersonaId,
    pub display_name: &'static str,
    /// Opaque display-color token (hex RGB)
    pub color: &'static str,
    pub description: &'static str,
}

static PERSONAS: [PersonaInfo; 5] = [
    PersonaInfo {
        id: PersonaId::Management,
        display_name: "Management",
        color: "#0078D4",
        description: "Strategic and business-focused perspective",
    },
    PersonaInfo {
        id: PersonaId::Technical,
        display_name: "Technical",
        color: "#107C10",
        description: "Technical accuracy and implementation details",
    },
    PersonaInfo {
        id: PersonaId::Hr,
        display_name: "HR",
        color: "#8764B8",
        description: "People and policy perspective",
    },
    PersonaInfo {
        id: PersonaId::Legal,
        display_name: "Legal",
        color: "#C43E1C",
        description: "Legal and compliance perspective",
    },
    PersonaInfo {
        id: PersonaId::Junior,
        display_name: "Junior",
        color: "#FFB900",
        description: "Fresh perspective and clarity check",
    },
];

/// Read-only lookup table from [`PersonaId`] to [`PersonaInfo`]
pub struct PersonaRegistry;

impl PersonaRegistry {
    /// Look up display metadata for a persona
    pub fn info(id: PersonaId) -> &'static PersonaInfo {
        // PERSONAS is laid out in PersonaId::ALL order
        &PERSONAS[id as usize]
    }

    /// Iterate all personas in processing order
    pub fn all() -> impl Iterator<Item = &'static PersonaInfo> {
        PERSONAS.iter()
    }
}

impl PersonaId {
    /// Shorthand for [`PersonaRegistry::info`]
    pub fn info(&self) -> &'static PersonaInfo {
        PersonaRegistry::info(*self)
    }

    /// Human-readable name, e.g. "HR"
    pub fn display_name(&self) -> &'static str {
        self.info().display_name
    }
}
