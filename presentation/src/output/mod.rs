//! Result and document rendering

pub mod console;
pub mod formatter;
