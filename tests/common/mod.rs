#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use serde_json::json;
use shortit::api::handlers::{health_handler, root_handler};
use shortit::api::routes::url_routes;
use shortit::domain::entities::{AliasPatch, AliasRecord, NewAliasRecord};
use shortit::domain::repositories::AliasRepository;
use shortit::error::AppError;
use shortit::infrastructure::persistence::MemoryAliasRepository;
use shortit::state::AppState;
use std::sync::Arc;

pub const TEST_PREFIX: &str = "https://shortit";

/// State over a fresh in-memory store.
pub fn create_test_state() -> AppState {
    AppState::new(Arc::new(MemoryAliasRepository::new()), TEST_PREFIX, 5)
}

/// Router with every route, without path normalization.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(url_routes())
        .with_state(state)
}

/// Repository whose backend is always unreachable.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::storage_unavailable("Storage unavailable", json!({ "reason": "test" }))
}

#[async_trait]
impl AliasRepository for UnavailableRepository {
    async fn find_by_destination(&self, _url: &str) -> Result<Option<AliasRecord>, AppError> {
        Err(unavailable())
    }

    async fn find_by_custom_alias(
        &self,
        _token: &str,
        _exclude_id: Option<i64>,
    ) -> Result<Option<AliasRecord>, AppError> {
        Err(unavailable())
    }

    async fn find_by_alias(&self, _alias: &str) -> Result<Option<AliasRecord>, AppError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<AliasRecord>, AppError> {
        Err(unavailable())
    }

    async fn insert(&self, _record: NewAliasRecord) -> Result<AliasRecord, AppError> {
        Err(unavailable())
    }

    async fn update(&self, _id: i64, _patch: AliasPatch) -> Result<AliasRecord, AppError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i64) -> Result<AliasRecord, AppError> {
        Err(unavailable())
    }

    async fn list_all(&self) -> Result<Vec<AliasRecord>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

pub fn create_unavailable_state() -> AppState {
    AppState::new(Arc::new(UnavailableRepository), TEST_PREFIX, 5)
}
