//! PostgreSQL implementation of the alias repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AliasPatch, AliasRecord, NewAliasRecord};
use crate::domain::repositories::AliasRepository;
use crate::error::AppError;

/// PostgreSQL repository for alias records.
///
/// Uniqueness is enforced by the `aliases_alias_key` constraint and the
/// partial `aliases_custom_alias_key` index; violations surface as
/// [`AppError::UniqueViolation`] through the `sqlx::Error` conversion.
pub struct PgAliasRepository {
    pool: Arc<PgPool>,
}

impl PgAliasRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AliasRepository for PgAliasRepository {
    async fn find_by_destination(&self, url: &str) -> Result<Option<AliasRecord>, AppError> {
        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            SELECT id, destination_url, alias, custom_alias, created_at
            FROM aliases
            WHERE destination_url = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_by_custom_alias(
        &self,
        token: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<AliasRecord>, AppError> {
        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            SELECT id, destination_url, alias, custom_alias, created_at
            FROM aliases
            WHERE custom_alias = $1
              AND ($2::BIGINT IS NULL OR id <> $2)
            "#,
        )
        .bind(token)
        .bind(exclude_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<AliasRecord>, AppError> {
        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            SELECT id, destination_url, alias, custom_alias, created_at
            FROM aliases
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AliasRecord>, AppError> {
        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            SELECT id, destination_url, alias, custom_alias, created_at
            FROM aliases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn insert(&self, new_record: NewAliasRecord) -> Result<AliasRecord, AppError> {
        let custom_alias = new_record.custom_alias.filter(|c| !c.is_empty());

        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            INSERT INTO aliases (destination_url, alias, custom_alias)
            VALUES ($1, $2, $3)
            RETURNING id, destination_url, alias, custom_alias, created_at
            "#,
        )
        .bind(new_record.destination_url)
        .bind(new_record.alias)
        .bind(custom_alias)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn update(&self, id: i64, patch: AliasPatch) -> Result<AliasRecord, AppError> {
        // Single statement: the unique checks and the write commit together.
        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            UPDATE aliases SET
                destination_url = COALESCE($2::TEXT, destination_url),
                alias           = COALESCE($3::TEXT, alias),
                custom_alias    = COALESCE(NULLIF($4::TEXT, ''), custom_alias)
            WHERE id = $1
            RETURNING id, destination_url, alias, custom_alias, created_at
            "#,
        )
        .bind(id)
        .bind(patch.destination_url)
        .bind(patch.alias)
        .bind(patch.custom_alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        record.ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<AliasRecord, AppError> {
        let record = sqlx::query_as::<_, AliasRecord>(
            r#"
            DELETE FROM aliases
            WHERE id = $1
            RETURNING id, destination_url, alias, custom_alias, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        record.ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))
    }

    async fn list_all(&self) -> Result<Vec<AliasRecord>, AppError> {
        let records = sqlx::query_as::<_, AliasRecord>(
            r#"
            SELECT id, destination_url, alias, custom_alias, created_at
            FROM aliases
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
