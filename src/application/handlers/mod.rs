//! Application command handlers, grouped by domain.

pub mod billing;
