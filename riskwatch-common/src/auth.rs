//! Password hashing primitives
//!
//! Pure functions only - no HTTP framework dependencies. Cookie and session
//! handling live in the web module; this module just owns the credential
//! digest format stored in the `users` table.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Generate a random per-user salt (16 bytes, hex-encoded)
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Digest a password with its salt
///
/// SHA-256 over `salt || password`, hex-encoded. The salt is stored next to
/// the digest in the users table.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a login attempt against the stored digest
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}
