//! Repository implementations.
//!
//! - [`PgAliasRepository`] - PostgreSQL storage via SQLx
//! - [`MemoryAliasRepository`] - In-process storage, lost on shutdown

pub mod memory_alias_repository;
pub mod pg_alias_repository;

pub use memory_alias_repository::MemoryAliasRepository;
pub use pg_alias_repository::PgAliasRepository;
