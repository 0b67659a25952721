//! Security utilities for session tokens and password hashing.

use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Prefix carried by every issued bearer token.
pub const TOKEN_PREFIX: &str = "xp_";

const TOKEN_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Generates a fresh bearer token (`xp_` + 32 alphanumerics).
pub fn generate_token() -> String {
    let random: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("{TOKEN_PREFIX}{random}")
}

/// Hashes a bearer token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(hash)
}

/// Verifies a bearer token against a stored hash using constant-time comparison.
pub fn verify_token(input: &str, stored_hash: &str) -> bool {
    let input_hash = hash_token(input);
    input_hash.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Hashes a password with a random salt.
///
/// The result is `<salt hex>$<HMAC-SHA256(salt, password) hex>`.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!("{}${}", hex::encode(salt), password_digest(&salt, password))
}

/// Checks a password against a value produced by [`hash_password`].
///
/// Malformed stored values never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };

    let expected = password_digest(&salt, password);
    expected.as_bytes().ct_eq(digest.as_bytes()).into()
}

fn password_digest(salt: &[u8], password: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(salt).expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();

        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + TOKEN_LEN);
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_token_hashing() {
        let token = "xp_test_abc123";
        let hash = hash_token(token);

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token(token));
        assert!(verify_token(token, &hash));
        assert!(!verify_token("xp_wrong", &hash));
    }

    #[test]
    fn test_password_roundtrip() {
        let stored = hash_password("s3cret!");

        assert!(verify_password("s3cret!", &stored));
        assert!(!verify_password("s3cret", &stored));
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_malformed_stored_password() {
        assert!(!verify_password("x", "no-separator"));
        assert!(!verify_password("x", "zz$abcd"));
    }
}
