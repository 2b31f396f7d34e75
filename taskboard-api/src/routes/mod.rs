//! Route handlers, organized by resource:
//!
//! - `auth`: registration, login, logout
//! - `board`: task listing, creation, status updates, deletion
//! - `health`: health check endpoint

pub mod auth;
pub mod board;
pub mod health;
