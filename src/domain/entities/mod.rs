//! Core domain entities.
//!
//! [`AliasRecord`] is the only persisted entity. The other types describe
//! inputs to storage ([`NewAliasRecord`], [`AliasPatch`]) and the outcome of an
//! allocation ([`Allocation`]).

pub mod alias_record;

pub use alias_record::{AliasPatch, AliasRecord, Allocation, AllocationStatus, NewAliasRecord};
