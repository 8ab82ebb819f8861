//! Business logic services for the application layer.

pub mod alias_allocator;

pub use alias_allocator::AliasAllocator;
