//! PostgreSQL repository tests. Run with `cargo test --features pg-tests`
//! and `DATABASE_URL` pointing at a server where test databases can be created.
#![cfg(feature = "pg-tests")]

use shortit::domain::entities::{AliasPatch, NewAliasRecord};
use shortit::domain::repositories::AliasRepository;
use shortit::error::AppError;
use shortit::infrastructure::persistence::PgAliasRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_record(url: &str, alias: &str, custom: Option<&str>) -> NewAliasRecord {
    NewAliasRecord {
        destination_url: url.to_string(),
        alias: alias.to_string(),
        custom_alias: custom.map(str::to_string),
    }
}

#[sqlx::test]
async fn test_insert_and_find(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    let record = repo
        .insert(new_record("https://example.com", "https://shortit/hello", Some("hello")))
        .await
        .unwrap();

    assert_eq!(record.destination_url, "https://example.com");
    assert_eq!(record.custom_alias.as_deref(), Some("hello"));

    let by_id = repo.find_by_id(record.id).await.unwrap();
    let by_alias = repo.find_by_alias("https://shortit/hello").await.unwrap();
    let by_destination = repo.find_by_destination("https://example.com").await.unwrap();
    let by_custom = repo.find_by_custom_alias("hello", None).await.unwrap();

    assert_eq!(by_id.as_ref(), Some(&record));
    assert_eq!(by_alias.as_ref(), Some(&record));
    assert_eq!(by_destination.as_ref(), Some(&record));
    assert_eq!(by_custom.as_ref(), Some(&record));

    assert!(
        repo.find_by_custom_alias("hello", Some(record.id))
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
async fn test_duplicate_alias_is_unique_violation(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    repo.insert(new_record("https://a.com", "https://shortit/AAAAA", None))
        .await
        .unwrap();

    let err = repo
        .insert(new_record("https://b.com", "https://shortit/AAAAA", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UniqueViolation { .. }));
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[sqlx::test]
async fn test_duplicate_custom_alias_is_unique_violation(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    repo.insert(new_record("https://a.com", "https://shortit/hello", Some("hello")))
        .await
        .unwrap();

    let err = repo
        .insert(new_record("https://b.com", "https://other/hello", Some("hello")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UniqueViolation { .. }));
}

#[sqlx::test]
async fn test_records_without_custom_alias_coexist(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    repo.insert(new_record("https://a.com", "https://shortit/AAAAA", None))
        .await
        .unwrap();
    repo.insert(new_record("https://b.com", "https://shortit/BBBBB", Some("")))
        .await
        .unwrap();

    let records = repo.list_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.custom_alias.is_none()));
}

#[sqlx::test]
async fn test_update_patch(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    let record = repo
        .insert(new_record("https://a.com", "https://shortit/AAAAA", None))
        .await
        .unwrap();

    let patch = AliasPatch {
        destination_url: Some("https://new.com".to_string()),
        alias: Some("https://shortit/fresh".to_string()),
        custom_alias: Some("fresh".to_string()),
    };
    let updated = repo.update(record.id, patch).await.unwrap();

    assert_eq!(updated.id, record.id);
    assert_eq!(updated.destination_url, "https://new.com");
    assert_eq!(updated.alias, "https://shortit/fresh");
    assert_eq!(updated.custom_alias.as_deref(), Some("fresh"));
    assert_eq!(updated.created_at, record.created_at);
}

#[sqlx::test]
async fn test_update_conflict_is_atomic(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    repo.insert(new_record("https://a.com", "https://shortit/foooo", Some("foooo")))
        .await
        .unwrap();
    let r2 = repo
        .insert(new_record("https://b.com", "https://shortit/baaar", Some("baaar")))
        .await
        .unwrap();

    let patch = AliasPatch {
        destination_url: Some("https://changed.com".to_string()),
        alias: Some("https://shortit/foooo".to_string()),
        custom_alias: Some("foooo".to_string()),
    };
    let err = repo.update(r2.id, patch).await.unwrap_err();

    assert!(matches!(err, AppError::UniqueViolation { .. }));
    assert_eq!(repo.find_by_id(r2.id).await.unwrap(), Some(r2));
}

#[sqlx::test]
async fn test_update_and_delete_unknown_id(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    let err = repo
        .update(
            404,
            AliasPatch {
                destination_url: Some("https://x.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = repo.delete(404).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
async fn test_delete_returns_snapshot(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));

    let record = repo
        .insert(new_record("https://x.com", "https://shortit/XXXXX", None))
        .await
        .unwrap();

    let deleted = repo.delete(record.id).await.unwrap();

    assert_eq!(deleted, record);
    assert!(repo.find_by_id(record.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgAliasRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
