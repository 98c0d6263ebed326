//! Password hashing using Argon2id

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::warn;

use crate::error::AuthError;

/// Hash a password with a fresh random salt
///
/// The returned PHC string embeds the algorithm, cost parameters and salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored hash
///
/// A mismatch and an unparseable stored hash both return `false`.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("pw").unwrap();
        let second = hash_password("pw").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("pw", &first));
        assert!(verify_password("pw", &second));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("pw").unwrap();

        for candidate in ["", "pW", "pw ", "pw\0", "password", "wp"] {
            assert!(!verify_password(candidate, &hash), "accepted {:?}", candidate);
        }
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", ""));
    }
}
