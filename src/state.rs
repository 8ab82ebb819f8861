//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::AliasAllocator;
use crate::domain::repositories::AliasRepository;

/// Allocator over whichever storage backend was configured.
pub type DynAliasAllocator = AliasAllocator<dyn AliasRepository>;

/// State cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub allocator: Arc<DynAliasAllocator>,
}

impl AppState {
    /// Builds the state around a repository.
    pub fn new(repository: Arc<dyn AliasRepository>, prefix: &str, max_attempts: usize) -> Self {
        Self {
            allocator: Arc::new(AliasAllocator::new(repository, prefix, max_attempts)),
        }
    }
}
