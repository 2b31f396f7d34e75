//! Authentication primitives for Taskboard
//!
//! - [`password`]: Argon2id password hashing and the length policy
//! - [`session`]: Random session tokens and their SHA-256 storage form
//! - [`middleware`]: Cookie-to-user resolution for protected routes
//!
//! Passwords are hashed with Argon2id and verified in constant time.
//! Session tokens are cryptographically random and stored only as hashes.

pub mod middleware;
pub mod password;
pub mod session;
