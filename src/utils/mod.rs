//! Utility functions used across the application.
//!
//! - [`alias_token`] - Alias token generation and normalization

pub mod alias_token;
