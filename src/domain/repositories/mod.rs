//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`AliasRepository`] - Alias record storage with uniqueness enforcement

pub mod alias_repository;

pub use alias_repository::AliasRepository;

#[cfg(test)]
pub use alias_repository::MockAliasRepository;
