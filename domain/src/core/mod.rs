//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: errors for unknown identifiers in settings and input

pub mod error;
