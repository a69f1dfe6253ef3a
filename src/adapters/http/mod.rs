//! HTTP adapters built on axum.

pub mod billing;
