//! Alias record entity: one short alias mapped to one destination URL.

use chrono::{DateTime, Utc};

/// A stored mapping between a short alias and its destination URL.
///
/// `alias` always has the form `<prefix>/<token>`. `custom_alias` holds the bare
/// token only when the caller picked it; generated aliases leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AliasRecord {
    pub id: i64,
    pub destination_url: String,
    pub alias: String,
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AliasRecord {
    /// Creates a new AliasRecord instance.
    pub fn new(
        id: i64,
        destination_url: String,
        alias: String,
        custom_alias: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            destination_url,
            alias,
            custom_alias,
            created_at,
        }
    }

    /// Returns true if the caller chose the alias token.
    pub fn is_custom(&self) -> bool {
        self.custom_alias.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Input data for inserting a new record. Storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAliasRecord {
    pub destination_url: String,
    pub alias: String,
    pub custom_alias: Option<String>,
}

/// Partial update for an existing record.
///
/// `None` fields are left unchanged. `alias` and `custom_alias` are always set
/// together by the allocator so the pair stays consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasPatch {
    pub destination_url: Option<String>,
    pub alias: Option<String>,
    pub custom_alias: Option<String>,
}

impl AliasPatch {
    /// Returns true if applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.destination_url.is_none() && self.alias.is_none() && self.custom_alias.is_none()
    }
}

/// Outcome of a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStatus {
    /// A new record was inserted.
    Created,
    /// The destination was already known; the stored record is returned as-is.
    AlreadyExists,
}

/// A record together with how the allocator obtained it.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub record: AliasRecord,
    pub status: AllocationStatus,
}

impl Allocation {
    pub fn created(record: AliasRecord) -> Self {
        Self {
            record,
            status: AllocationStatus::Created,
        }
    }

    pub fn already_exists(record: AliasRecord) -> Self {
        Self {
            record,
            status: AllocationStatus::AlreadyExists,
        }
    }

    pub fn is_created(&self) -> bool {
        self.status == AllocationStatus::Created
    }
}
