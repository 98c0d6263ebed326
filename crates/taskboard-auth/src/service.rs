//! Signup and login flows

use taskboard_db::{Database, DbError, NewUser, User, UserRole, utils::normalize_email};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::jwt::TokenManager;
use crate::password::{hash_password, verify_password};

/// Maximum allowed length for names and emails
const MAX_FIELD_LENGTH: usize = 254;
/// Maximum allowed password length (bounds hashing cost)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Verified for unknown emails so both login failure paths cost the same.
/// A valid Argon2 hash that no password matches.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

/// Signup input; every field is mandatory
#[derive(Debug, Clone, Default)]
pub struct Signup {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Return the field value, or a validation error naming the missing field
fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AuthError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::Validation(format!("Missing required field: {}", field))),
    }
}

fn check_length(value: &str, field: &str, max: usize) -> Result<(), AuthError> {
    if value.chars().count() > max {
        return Err(AuthError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Register a new user
///
/// No token is issued; the client logs in separately.
pub async fn signup(db: &Database, input: Signup) -> Result<User, AuthError> {
    let name = required(&input.name, "name")?;
    let email = normalize_email(required(&input.email, "email")?);
    // Passwords are taken verbatim, only checked for presence
    let password = match input.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(AuthError::Validation("Missing required field: password".to_string())),
    };
    let role_str = required(&input.role, "role")?;

    check_length(name, "name", MAX_FIELD_LENGTH)?;
    check_length(&email, "email", MAX_FIELD_LENGTH)?;
    check_length(password, "password", MAX_PASSWORD_LENGTH)?;
    let role: UserRole = role_str
        .parse()
        .map_err(|_| AuthError::Validation(format!("Invalid role: {}", role_str)))?;

    debug!("Signup attempt for: {}", email);

    if db.get_user_by_email(&email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash_password(password)?;

    let user = db
        .insert_user(NewUser {
            name: name.to_string(),
            email,
            password_hash,
            role,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent signup for the same email
            DbError::Duplicate(_) => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        })?;

    metrics::counter!("taskboard_signups_total").increment(1);
    info!("User {} signed up", user.id);

    Ok(user)
}

/// Authenticate with email and password and issue a session token
///
/// Unknown emails and wrong passwords are indistinguishable to the caller.
pub async fn login(
    db: &Database,
    tokens: &TokenManager,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<LoginOutcome, AuthError> {
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AuthError::Validation(
            "Missing required field: email and password are required".to_string(),
        ));
    };
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::Validation(
            "Missing required field: email and password are required".to_string(),
        ));
    }
    check_length(email, "email", MAX_FIELD_LENGTH)?;
    check_length(password, "password", MAX_PASSWORD_LENGTH)?;

    let email = normalize_email(email);
    debug!("Login attempt for: {}", email);

    let user = db.get_user_by_email(&email).await?;

    // Always run a verification, against the dummy hash for unknown emails
    let hash_to_verify = user.as_ref().map_or(DUMMY_HASH, |u| u.password_hash.as_str());
    let password_valid = verify_password(password, hash_to_verify);

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            metrics::counter!("taskboard_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials);
        }
    };

    let token = tokens.issue(user.id, user.role)?;

    metrics::counter!("taskboard_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in", user.id);

    Ok(LoginOutcome { token, user })
}
