//! Application layer - use-case orchestration.
//!
//! Command handlers coordinate domain logic and ports. They hold no
//! transport concerns; the HTTP adapter translates their outcomes into
//! responses.

pub mod handlers;
