//! Alias allocation service.
//!
//! Decides, for every (destination URL, optional custom alias) pair, whether to
//! reuse an existing record, mint a random alias, accept the caller's alias or
//! reject the request. The allocator holds no shared mutable state: its
//! lookups are a fast path for friendly errors, and the repository's unique
//! constraints decide every race.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{AliasPatch, AliasRecord, Allocation, NewAliasRecord};
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;
use crate::utils::alias_token::{compose_alias, generate_token, normalize_alias};

/// Default number of attempts for a generated alias before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Service that assigns aliases and keeps both uniqueness domains consistent.
///
/// Many allocators may run concurrently against one repository.
pub struct AliasAllocator<R: AliasRepository + ?Sized> {
    repository: Arc<R>,
    prefix: String,
    max_attempts: usize,
}

impl<R: AliasRepository + ?Sized> AliasAllocator<R> {
    /// Creates a new allocator.
    ///
    /// `prefix` is prepended to every token (`<prefix>/<token>`). `max_attempts`
    /// bounds the retries for generated tokens and is clamped to at least 1.
    pub fn new(repository: Arc<R>, prefix: impl Into<String>, max_attempts: usize) -> Self {
        Self {
            repository,
            prefix: prefix.into().trim_end_matches('/').to_string(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// The fixed alias prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Allocates an alias for `destination_url`.
    ///
    /// # Deduplication
    ///
    /// If a record for the exact destination already exists, it is returned
    /// unchanged with [`AllocationStatus::AlreadyExists`](crate::domain::entities::AllocationStatus),
    /// even when a different custom alias was requested.
    ///
    /// # Alias selection
    ///
    /// - A custom alias is normalized and must not be claimed by any record
    /// - Otherwise a random 5-character token is generated, retried on
    ///   collision up to the configured number of attempts
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasConflict`] if the custom alias is already claimed.
    /// Returns [`AppError::UniqueViolation`] if storage rejected the insert
    /// (a lost race, or generated tokens kept colliding).
    /// Returns [`AppError::StorageUnavailable`] if storage cannot be reached.
    pub async fn create(
        &self,
        destination_url: String,
        custom_alias: Option<String>,
    ) -> Result<Allocation, AppError> {
        if let Some(existing) = self
            .repository
            .find_by_destination(&destination_url)
            .await?
        {
            debug!(id = existing.id, alias = %existing.alias, "Destination already shortened");
            return Ok(Allocation::already_exists(existing));
        }

        let record = match normalize_alias(custom_alias.as_deref()) {
            Some(token) => self.insert_custom(destination_url, token).await?,
            None => self.insert_generated(destination_url).await?,
        };

        info!(id = record.id, alias = %record.alias, "Alias created");

        Ok(Allocation::created(record))
    }

    /// Updates the destination and/or the custom alias of record `id`.
    ///
    /// Empty values are treated as absent. The destination is not checked for
    /// duplicates. A new custom alias replaces both `custom_alias` and `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    /// Returns [`AppError::AliasConflict`] if another record owns the alias; the
    /// stored record is left untouched.
    /// Returns [`AppError::UniqueViolation`] if storage rejected the write.
    pub async fn update(
        &self,
        id: i64,
        destination_url: Option<String>,
        custom_alias: Option<String>,
    ) -> Result<AliasRecord, AppError> {
        let current = self.resolve(id).await?;

        let mut patch = AliasPatch {
            destination_url: destination_url.filter(|url| !url.is_empty()),
            ..Default::default()
        };

        if let Some(token) = normalize_alias(custom_alias.as_deref()) {
            let alias = compose_alias(&self.prefix, &token);
            self.ensure_alias_free(&token, &alias, Some(id)).await?;

            patch.alias = Some(alias);
            patch.custom_alias = Some(token);
        }

        if patch.is_empty() {
            debug!(id, "Nothing to update");
            return Ok(current);
        }

        let updated = self.repository.update(id, patch).await?;

        info!(id, alias = %updated.alias, "Alias updated");

        Ok(updated)
    }

    /// Deletes record `id` and returns the values it held.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    pub async fn delete(&self, id: i64) -> Result<AliasRecord, AppError> {
        let deleted = self.repository.delete(id).await?;

        info!(id, alias = %deleted.alias, "Alias deleted");

        Ok(deleted)
    }

    /// Retrieves record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    pub async fn resolve(&self, id: i64) -> Result<AliasRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))
    }

    /// Lists all records. Empty storage yields an empty vector.
    pub async fn list(&self) -> Result<Vec<AliasRecord>, AppError> {
        self.repository.list_all().await
    }

    /// Checks that storage is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Inserts a record with a caller-chosen token.
    async fn insert_custom(
        &self,
        destination_url: String,
        token: String,
    ) -> Result<AliasRecord, AppError> {
        let alias = compose_alias(&self.prefix, &token);
        self.ensure_alias_free(&token, &alias, None).await?;

        let new_record = NewAliasRecord {
            destination_url,
            alias,
            custom_alias: Some(token),
        };

        self.repository.insert(new_record).await.inspect_err(|e| {
            if e.is_conflict() {
                warn!(error = %e, "Custom alias claimed concurrently");
            }
        })
    }

    /// Inserts a record with a random token, retrying on alias collisions.
    async fn insert_generated(&self, destination_url: String) -> Result<AliasRecord, AppError> {
        for attempt in 1..=self.max_attempts {
            let new_record = NewAliasRecord {
                destination_url: destination_url.clone(),
                alias: compose_alias(&self.prefix, &generate_token()),
                custom_alias: None,
            };

            match self.repository.insert(new_record).await {
                Ok(record) => return Ok(record),
                Err(AppError::UniqueViolation { details, .. }) => {
                    warn!(attempt, ?details, "Generated alias collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::unique_violation(
            "Failed to allocate a unique alias",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Rejects `token` if another record already owns it, either as a custom
    /// alias or as the full alias of a generated record.
    async fn ensure_alias_free(
        &self,
        token: &str,
        alias: &str,
        exclude_id: Option<i64>,
    ) -> Result<(), AppError> {
        let by_custom = self
            .repository
            .find_by_custom_alias(token, exclude_id)
            .await?;

        let owner = match by_custom {
            Some(record) => Some(record),
            None => self
                .repository
                .find_by_alias(alias)
                .await?
                .filter(|record| Some(record.id) != exclude_id),
        };

        if let Some(owner) = owner {
            warn!(alias = %alias, owner = owner.id, "Custom alias already in use");
            return Err(AppError::alias_conflict(
                "Custom name already in use",
                json!({ "customName": token }),
            ));
        }

        Ok(())
    }
}
