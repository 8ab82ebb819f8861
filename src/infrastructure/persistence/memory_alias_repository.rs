//! In-memory implementation of the alias repository.
//!
//! Contents are lost on shutdown. Every write runs inside one critical
//! section, so the uniqueness checks and the write are atomic just like the
//! unique indexes of the PostgreSQL backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::entities::{AliasPatch, AliasRecord, NewAliasRecord};
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, AliasRecord>,
}

impl Inner {
    /// Returns the constraint `alias`/`custom_alias` would violate, ignoring `skip_id`.
    fn violated_constraint(
        &self,
        alias: Option<&str>,
        custom_alias: Option<&str>,
        skip_id: Option<i64>,
    ) -> Option<&'static str> {
        self.records
            .values()
            .filter(|record| Some(record.id) != skip_id)
            .find_map(|record| {
                if alias.is_some_and(|a| a == record.alias) {
                    Some("aliases_alias_key")
                } else if custom_alias.is_some_and(|c| record.custom_alias.as_deref() == Some(c)) {
                    Some("aliases_custom_alias_key")
                } else {
                    None
                }
            })
    }
}

/// Process-local alias storage.
#[derive(Debug, Default)]
pub struct MemoryAliasRepository {
    inner: Mutex<Inner>,
}

impl MemoryAliasRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_violation(constraint: &'static str) -> AppError {
    AppError::unique_violation(
        "Unique constraint violation",
        json!({ "constraint": constraint }),
    )
}

fn record_not_found(id: i64) -> AppError {
    AppError::not_found("URL not found", json!({ "id": id }))
}

#[async_trait]
impl AliasRepository for MemoryAliasRepository {
    async fn find_by_destination(&self, url: &str) -> Result<Option<AliasRecord>, AppError> {
        Ok(self
            .inner
            .lock()
            .await
            .records
            .values()
            .find(|record| record.destination_url == url)
            .cloned())
    }

    async fn find_by_custom_alias(
        &self,
        token: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<AliasRecord>, AppError> {
        Ok(self
            .inner
            .lock()
            .await
            .records
            .values()
            .find(|record| {
                record.custom_alias.as_deref() == Some(token) && Some(record.id) != exclude_id
            })
            .cloned())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<AliasRecord>, AppError> {
        Ok(self
            .inner
            .lock()
            .await
            .records
            .values()
            .find(|record| record.alias == alias)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AliasRecord>, AppError> {
        Ok(self.inner.lock().await.records.get(&id).cloned())
    }

    async fn insert(&self, new_record: NewAliasRecord) -> Result<AliasRecord, AppError> {
        let mut inner = self.inner.lock().await;

        let custom_alias = new_record.custom_alias.filter(|c| !c.is_empty());

        if let Some(constraint) =
            inner.violated_constraint(Some(&new_record.alias), custom_alias.as_deref(), None)
        {
            return Err(unique_violation(constraint));
        }

        inner.next_id += 1;
        let record = AliasRecord::new(
            inner.next_id,
            new_record.destination_url,
            new_record.alias,
            custom_alias,
            Utc::now(),
        );

        inner.records.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update(&self, id: i64, patch: AliasPatch) -> Result<AliasRecord, AppError> {
        let mut inner = self.inner.lock().await;

        if !inner.records.contains_key(&id) {
            return Err(record_not_found(id));
        }

        if let Some(constraint) =
            inner.violated_constraint(patch.alias.as_deref(), patch.custom_alias.as_deref(), Some(id))
        {
            return Err(unique_violation(constraint));
        }

        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| record_not_found(id))?;

        if let Some(url) = patch.destination_url {
            record.destination_url = url;
        }

        if let Some(alias) = patch.alias {
            record.alias = alias;
        }

        if let Some(custom_alias) = patch.custom_alias {
            record.custom_alias = Some(custom_alias).filter(|c| !c.is_empty());
        }

        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<AliasRecord, AppError> {
        self.inner
            .lock()
            .await
            .records
            .remove(&id)
            .ok_or_else(|| record_not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<AliasRecord>, AppError> {
        Ok(self.inner.lock().await.records.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(url: &str, alias: &str, custom: Option<&str>) -> NewAliasRecord {
        NewAliasRecord {
            destination_url: url.to_string(),
            alias: alias.to_string(),
            custom_alias: custom.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = MemoryAliasRepository::new();

        let a = repo
            .insert(new_record("https://a.com", "p/aaaaa", None))
            .await
            .unwrap();
        let b = repo
            .insert(new_record("https://b.com", "p/bbbbb", None))
            .await
            .unwrap();

        assert!(b.id > a.id);
        assert_eq!(repo.list_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_alias() {
        let repo = MemoryAliasRepository::new();

        repo.insert(new_record("https://a.com", "p/same1", None))
            .await
            .unwrap();
        let err = repo
            .insert(new_record("https://b.com", "p/same1", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UniqueViolation { .. }));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_custom_alias() {
        let repo = MemoryAliasRepository::new();

        repo.insert(new_record("https://a.com", "p/hello", Some("hello")))
            .await
            .unwrap();
        let err = repo
            .insert(new_record("https://b.com", "q/hello", Some("hello")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_empty_custom_alias_is_stored_as_none() {
        let repo = MemoryAliasRepository::new();

        let a = repo
            .insert(new_record("https://a.com", "p/aaaaa", Some("")))
            .await
            .unwrap();
        let b = repo
            .insert(new_record("https://b.com", "p/bbbbb", Some("")))
            .await
            .unwrap();

        assert!(a.custom_alias.is_none());
        assert!(b.custom_alias.is_none());
    }

    #[tokio::test]
    async fn test_find_by_custom_alias_excludes_id() {
        let repo = MemoryAliasRepository::new();

        let a = repo
            .insert(new_record("https://a.com", "p/hello", Some("hello")))
            .await
            .unwrap();

        assert!(repo.find_by_custom_alias("hello", None).await.unwrap().is_some());
        assert!(
            repo.find_by_custom_alias("hello", Some(a.id))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_conflict_leaves_record_untouched() {
        let repo = MemoryAliasRepository::new();

        repo.insert(new_record("https://a.com", "p/foo", Some("foo")))
            .await
            .unwrap();
        let b = repo
            .insert(new_record("https://b.com", "p/bar", Some("bar")))
            .await
            .unwrap();

        let patch = AliasPatch {
            destination_url: Some("https://changed.com".to_string()),
            alias: Some("p/foo".to_string()),
            custom_alias: Some("foo".to_string()),
        };
        let err = repo.update(b.id, patch).await.unwrap_err();

        assert!(matches!(err, AppError::UniqueViolation { .. }));
        assert_eq!(repo.find_by_id(b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = MemoryAliasRepository::new();
        let err = repo.update(1, AliasPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_returns_record() {
        let repo = MemoryAliasRepository::new();

        let a = repo
            .insert(new_record("https://a.com", "p/aaaaa", None))
            .await
            .unwrap();

        assert_eq!(repo.delete(a.id).await.unwrap(), a);
        assert!(repo.find_by_id(a.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(a.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
