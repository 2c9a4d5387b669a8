//! Persona domain
//!
//! A persona is a named reviewing viewpoint (e.g. "Legal") whose prompt
//! biases the model's feedback. The set is fixed at compile time.

pub mod id;
pub mod registry;

pub use id::PersonaId;
pub use registry::{PersonaInfo, PersonaRegistry};
