//! Adapters - concrete implementations of ports against external systems.

pub mod airtable;
pub mod http;
