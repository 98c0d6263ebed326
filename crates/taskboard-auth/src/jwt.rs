//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use taskboard_db::UserRole;
use tracing::debug;

use crate::error::AuthError;
use crate::middleware::AuthUser;

/// Lifetime of an issued token
pub const TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Issues and verifies HS256 session tokens
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager").finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a token manager from the signing secret
    ///
    /// An empty secret is a deployment error and is rejected here, at startup.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Configuration(
                "JWT secret is not configured".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issue a token for a user, valid for one hour
    pub fn issue(&self, user_id: i64, role: UserRole) -> Result<String, AuthError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        user_id: i64,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = now + Duration::seconds(TOKEN_TTL_SECS);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing token for user: {}", user_id);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::from)
    }

    /// Verify a token and return the identity it asserts
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    ///
    /// Every failure is reported as `InvalidToken` so callers cannot tell
    /// which check rejected it.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthUser, AuthError> {
        // Expiry is checked below against `now` instead of the wall clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            debug!("Token rejected: expired at {}", claims.exp);
            return Err(AuthError::InvalidToken);
        }

        AuthUser::try_from(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manager() -> TokenManager {
        TokenManager::new("test-secret-key").unwrap()
    }

    #[test]
    fn test_missing_secret_is_a_configuration_error() {
        assert!(matches!(TokenManager::new(""), Err(AuthError::Configuration(_))));
        assert!(matches!(TokenManager::new("   "), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_token_round_trip() {
        let manager = manager();

        for (id, role) in [
            (1, UserRole::Admin),
            (42, UserRole::User),
            (7, UserRole::Unassigned),
            (i64::MAX, UserRole::User),
        ] {
            let token = manager.issue(id, role).unwrap();
            let user = manager.verify(&token).unwrap();
            assert_eq!(user, AuthUser { id, role });
        }
    }

    #[test]
    fn test_token_expires_after_one_hour() {
        let manager = manager();
        let issued = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let token = manager.issue_at(5, UserRole::User, issued).unwrap();

        let just_before = issued + Duration::seconds(TOKEN_TTL_SECS - 1);
        assert!(manager.verify_at(&token, just_before).is_ok());

        let just_after = issued + Duration::seconds(TOKEN_TTL_SECS + 1);
        assert!(matches!(
            manager.verify_at(&token, just_after),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let manager = manager();
        let token = manager.issue(3, UserRole::Admin).unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] ^= 0x01;
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                matches!(manager.verify(&tampered), Err(AuthError::InvalidToken)),
                "tampered byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = TokenManager::new("another-secret").unwrap();
        let token = other.issue(1, UserRole::Admin).unwrap();

        assert!(matches!(manager().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = manager();
        for token in ["", "invalid-token", "a.b.c", "...."] {
            assert!(matches!(manager.verify(token), Err(AuthError::InvalidToken)));
        }
    }
}
