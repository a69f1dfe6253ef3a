//! Airtable adapter implementing the user store port.

mod client;

pub use client::AirtableClient;
