//! Database models for Taskboard
//!
//! - `user`: Registered accounts and credential lookups
//! - `task`: Board entries with a three-state status
//! - `session`: Server-side login sessions keyed by hashed cookie tokens

pub mod session;
pub mod task;
pub mod user;
