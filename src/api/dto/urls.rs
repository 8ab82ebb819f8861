//! DTOs for the `/urls` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::domain::entities::AliasRecord;
use crate::utils::alias_token::normalize_alias;

/// Minimum length of a custom name once whitespace runs are hyphenated.
const CUSTOM_NAME_MIN_LENGTH: usize = 5;

/// Checks the length of the token the custom name normalizes to, so that
/// `"a   b"` (stored as `a-b`) is rejected.
fn validate_custom_name(name: &str) -> Result<(), ValidationError> {
    let length = normalize_alias(Some(name)).map_or(0, |token| token.chars().count());

    if length < CUSTOM_NAME_MIN_LENGTH {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Custom name should be at least 5 letters")));
    }

    Ok(())
}

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    /// Destination URL.
    #[validate(url(message = "URL should be a valid URL"))]
    pub original_url: String,

    /// Optional custom alias; whitespace runs become hyphens.
    #[validate(custom(function = "validate_custom_name"))]
    pub custom_name: Option<String>,
}

/// Request to change a record. Absent or empty fields are left as they are.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUrlRequest {
    #[validate(url(message = "URL should be a valid URL"))]
    pub original_url: Option<String>,

    #[validate(custom(function = "validate_custom_name"))]
    pub custom_name: Option<String>,
}

/// Payload returned after shortening.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlData {
    pub id: i64,
    pub short_url: String,
}

/// Full JSON representation of a record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecordResponse {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AliasRecord> for UrlRecordResponse {
    fn from(record: AliasRecord) -> Self {
        Self {
            id: record.id,
            original_url: record.destination_url,
            short_url: record.alias,
            custom_name: record.custom_alias,
            created_at: record.created_at,
        }
    }
}

/// `{"message": ..., "data": ...}` envelope used by mutating endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: &'static str,
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok: CreateUrlRequest = serde_json::from_value(serde_json::json!({
            "originalUrl": "https://example.com/page",
            "customName": "my alias"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad_url = CreateUrlRequest {
            original_url: "not a url".to_string(),
            custom_name: None,
        };
        assert!(bad_url.validate().is_err());

        let short_name = CreateUrlRequest {
            original_url: "https://example.com".to_string(),
            custom_name: Some("abc".to_string()),
        };
        assert!(short_name.validate().is_err());
    }

    #[test]
    fn test_custom_name_length_counts_normalized_token() {
        let spaced = CreateUrlRequest {
            original_url: "https://example.com".to_string(),
            custom_name: Some("a   b".to_string()),
        };
        assert!(spaced.validate().is_err());

        let blank = CreateUrlRequest {
            original_url: "https://example.com".to_string(),
            custom_name: Some("     ".to_string()),
        };
        assert!(blank.validate().is_err());

        let enough = UpdateUrlRequest {
            original_url: None,
            custom_name: Some("ab cd".to_string()),
        };
        assert!(enough.validate().is_ok());

        let update_spaced = UpdateUrlRequest {
            original_url: None,
            custom_name: Some("a   b".to_string()),
        };
        assert!(update_spaced.validate().is_err());
    }

    #[test]
    fn test_update_request_allows_empty_body() {
        let req: UpdateUrlRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(req.original_url.is_none());
        assert!(req.custom_name.is_none());
    }

    #[test]
    fn test_record_response_is_camel_case() {
        let record = AliasRecord::new(
            7,
            "https://example.com".to_string(),
            "https://shortit/hello".to_string(),
            None,
            Utc::now(),
        );

        let json = serde_json::to_value(UrlRecordResponse::from(record)).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["originalUrl"], "https://example.com");
        assert_eq!(json["shortUrl"], "https://shortit/hello");
        assert!(json.get("customName").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
