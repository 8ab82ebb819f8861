//! Data Transfer Objects for API requests and responses.
//!
//! Field names are camelCase on the wire; request bodies are checked with
//! validator before reaching the allocator.

pub mod health;
pub mod urls;
