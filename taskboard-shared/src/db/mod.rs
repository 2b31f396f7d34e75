//! Database layer for Taskboard
//!
//! - `pool`: PostgreSQL connection pool management with health checks
//! - `migrations`: Database migration runner
//!
//! Models live in the `models` module at the crate root.

pub mod migrations;
pub mod pool;
