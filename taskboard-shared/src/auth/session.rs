//! Session token utilities.
//!
//! Works together with the `models::session` module: this module generates
//! and hashes tokens, that one persists them.
//!
//! # Security
//!
//! - **Format**: 32 random alphanumeric characters (base62)
//! - **Storage**: tokens are hashed with SHA-256 before storage; the
//!   database never sees the plaintext
//! - **Lookup**: sessions are fetched by hash, so a stolen database dump
//!   cannot be replayed as cookies
//!
//! ```
//! use taskboard_shared::auth::session::{generate_session_token, hash_session_token};
//!
//! let (token, hash) = generate_session_token();
//! assert_eq!(token.len(), 32);
//! assert_eq!(hash, hash_session_token(&token));
//! ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a session token in characters.
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Generates a new session token.
///
/// Returns the plaintext token (for the cookie) and its SHA-256 hex digest
/// (for the database). Key space: 62^32, roughly 2^190 combinations.
pub fn generate_session_token() -> (String, String) {
    let token = generate_random_string(SESSION_TOKEN_LENGTH);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string (base62, cookie-safe).
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token with SHA-256. Hex output, 64 characters.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks that a cookie value looks like a token this server issued:
/// correct length and alphanumeric only. Lets the middleware reject garbage
/// cookies without a database round-trip.
pub fn validate_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let (token1, hash1) = generate_session_token();
        let (token2, hash2) = generate_session_token();

        assert_eq!(token1.len(), SESSION_TOKEN_LENGTH);
        assert!(token1.chars().all(|c| c.is_ascii_alphanumeric()));

        // Randomness
        assert_ne!(token1, token2);
        assert_ne!(hash1, hash2);

        // SHA-256 hex is 64 chars
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_session_token_deterministic() {
        let hash1 = hash_session_token("sometoken");
        let hash2 = hash_session_token("sometoken");
        assert_eq!(hash1, hash2);

        assert_ne!(hash1, hash_session_token("othertoken"));
    }

    #[test]
    fn test_generated_token_matches_its_hash() {
        let (token, hash) = generate_session_token();
        assert_eq!(hash, hash_session_token(&token));
    }

    #[test]
    fn test_validate_token_format() {
        let (token, _) = generate_session_token();
        assert!(validate_token_format(&token));

        // Wrong length
        assert!(!validate_token_format("short"));
        assert!(!validate_token_format(&"a".repeat(33)));

        // Non-alphanumeric
        assert!(!validate_token_format(&format!("{}!", "a".repeat(31))));
        assert!(!validate_token_format(""));
    }
}
