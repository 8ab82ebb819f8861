//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::alias_allocator::AliasAllocator`] - Alias allocation, update, lookup and deletion

pub mod services;
