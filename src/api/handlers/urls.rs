//! Handlers for the `/urls` endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::urls::{
    CreateUrlRequest, MessageResponse, ShortUrlData, UpdateUrlRequest, UrlRecordResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Parses a path identifier, rejecting anything that is not a positive integer.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request("Invalid ID format", json!({ "id": raw })))
}

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com", "customName": "my link" }
/// ```
///
/// # Response
///
/// - **201 Created** with `"URL shortened successfully"` for a new record
/// - **200 OK** with `"Original URL already exists"` when the destination is
///   already known; the existing alias is returned
///
/// ```json
/// { "message": "URL shortened successfully",
///   "data": { "id": 1, "shortUrl": "https://shortit/my-link" } }
/// ```
///
/// # Errors
///
/// - 400 if validation fails
/// - 409 if the custom name is already in use
pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<MessageResponse<ShortUrlData>>), AppError> {
    payload.validate()?;

    let allocation = state
        .allocator
        .create(payload.original_url, payload.custom_name)
        .await?;

    let (status, message) = if allocation.is_created() {
        (StatusCode::CREATED, "URL shortened successfully")
    } else {
        (StatusCode::OK, "Original URL already exists")
    };

    Ok((
        status,
        Json(MessageResponse {
            message,
            data: ShortUrlData {
                id: allocation.record.id,
                short_url: allocation.record.alias,
            },
        }),
    ))
}

/// Lists every record in storage order (`[]` when empty).
///
/// `GET /urls`
pub async fn list_urls_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UrlRecordResponse>>, AppError> {
    let records = state.allocator.list().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Returns one record.
///
/// `GET /urls/{id}`; 404 if the id is unknown.
pub async fn get_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlRecordResponse>, AppError> {
    let id = parse_id(&id)?;
    let record = state.allocator.resolve(id).await?;
    Ok(Json(record.into()))
}

/// Changes the destination and/or custom name of a record.
///
/// # Endpoint
///
/// `PUT /urls/{id}`
///
/// # Request Body
///
/// Both fields are optional; empty values are ignored.
///
/// ```json
/// { "originalUrl": "https://new.example.com", "customName": "new name" }
/// ```
///
/// # Errors
///
/// - 400 if validation fails
/// - 404 if the id is unknown
/// - 409 if another record already uses the custom name
pub async fn update_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<MessageResponse<UrlRecordResponse>>, AppError> {
    let id = parse_id(&id)?;
    payload.validate()?;

    let record = state
        .allocator
        .update(id, payload.original_url, payload.custom_name)
        .await?;

    Ok(Json(MessageResponse {
        message: "URL updated successfully",
        data: record.into(),
    }))
}

/// Deletes a record and returns its last state.
///
/// `DELETE /urls/{id}`; 404 if the id is unknown.
pub async fn delete_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse<UrlRecordResponse>>, AppError> {
    let id = parse_id(&id)?;
    let record = state.allocator.delete(id).await?;

    Ok(Json(MessageResponse {
        message: "URL deleted successfully",
        data: record.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_id("abc"), Err(AppError::Validation { .. })));
        assert!(matches!(parse_id("0"), Err(AppError::Validation { .. })));
        assert!(matches!(parse_id("-3"), Err(AppError::Validation { .. })));
    }
}
