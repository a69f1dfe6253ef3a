//! Domain layer - core business types with no I/O.

pub mod billing;
