//! HTTP middleware for the API server
//!
//! - `security`: baseline security response headers

pub mod security;
