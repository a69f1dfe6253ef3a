//! Planner backend - billing webhook synchronizer and record-store API.
//!
//! Keeps Airtable user records in sync with Lemon Squeezy subscription
//! events and persists chat history for the planner frontend.
//!
//! # Architecture
//!
//! Hexagonal layering:
//!
//! - `domain` - signature verification, event schema, subscription state
//! - `ports` - the `UserStore` interface to the record store
//! - `application` - command handlers orchestrating domain and ports
//! - `adapters` - Airtable client and axum HTTP surface
//! - `config` - environment-driven typed configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
