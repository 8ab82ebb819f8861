//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, get_url_handler, list_urls_handler,
    update_url_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Alias management routes.
///
/// # Endpoints
///
/// - `POST   /urls`       - Shorten a URL
/// - `GET    /urls`       - List every record
/// - `GET    /urls/{id}`  - Fetch one record
/// - `PUT    /urls/{id}`  - Change destination and/or custom name
/// - `DELETE /urls/{id}`  - Delete a record
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route(
            "/urls/{id}",
            get(get_url_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
}
