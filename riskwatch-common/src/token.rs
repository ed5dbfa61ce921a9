//! Verification token generation
//!
//! Each stored prediction carries a `blockchain_hash` field: `0x` followed by
//! 40 lowercase hex characters. Despite the name, the token is independent
//! local randomness, NOT a content hash of the submission - it provides no
//! tamper-evidence. That behavior is deliberate and must not be changed to a
//! real digest without an explicit decision by the owners of the record
//! format.

use rand::Rng;

const TOKEN_HEX_LEN: usize = 40;

/// Generate a verification token for one submission
///
/// Draws from the thread-local (non-cryptographic-purpose) RNG; two calls are
/// independent even for identical payloads.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let mut token = String::with_capacity(2 + TOKEN_HEX_LEN);
    token.push_str("0x");
    for _ in 0..TOKEN_HEX_LEN {
        let nibble: u8 = rng.gen_range(0..16);
        token.push(char::from_digit(nibble as u32, 16).unwrap());
    }
    token
}
