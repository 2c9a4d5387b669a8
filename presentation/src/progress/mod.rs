//! Progress display for analysis runs

pub mod reporter;
