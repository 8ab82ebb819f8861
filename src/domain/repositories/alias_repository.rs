//! Repository trait for alias record storage.

use crate::domain::entities::{AliasPatch, AliasRecord, NewAliasRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract the allocator relies on.
///
/// All lookups are exact-match on the stated field. Implementations must
/// enforce alias uniqueness and custom-alias uniqueness atomically inside
/// [`insert`](AliasRepository::insert) and [`update`](AliasRepository::update):
/// the allocator's own pre-checks are not the only guard against concurrent
/// writers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAliasRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryAliasRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasRepository: Send + Sync {
    /// Finds the record whose destination URL equals `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn find_by_destination(&self, url: &str) -> Result<Option<AliasRecord>, AppError>;

    /// Finds the record holding the custom alias `token`.
    ///
    /// When `exclude_id` is set, that record is ignored, so an update can ask
    /// "does any *other* record own this token".
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn find_by_custom_alias(
        &self,
        token: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<AliasRecord>, AppError>;

    /// Finds the record whose full alias (`<prefix>/<token>`) equals `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<AliasRecord>, AppError>;

    /// Finds a record by its storage identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<AliasRecord>, AppError>;

    /// Inserts a new record; all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UniqueViolation`] if the alias or the custom alias is
    /// already taken.
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_record: NewAliasRecord) -> Result<AliasRecord, AppError>;

    /// Applies `patch` to the record `id` as a single atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    /// Returns [`AppError::UniqueViolation`] if the patched alias or custom alias
    /// collides with another record; the stored record is then unchanged.
    async fn update(&self, id: i64, patch: AliasPatch) -> Result<AliasRecord, AppError>;

    /// Removes the record `id` and returns its last stored values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    async fn delete(&self, id: i64) -> Result<AliasRecord, AppError>;

    /// Lists every record in storage-native order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn list_all(&self) -> Result<Vec<AliasRecord>, AppError>;

    /// Cheap round trip used by the health check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if storage cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
