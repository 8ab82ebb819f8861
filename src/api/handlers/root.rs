//! Handler for the root endpoint.

/// Welcome text.
///
/// `GET /`
pub async fn root_handler() -> &'static str {
    "Welcome to Shortit URL shortener"
}
