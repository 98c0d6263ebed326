//! Taskboard Authentication and Authorization
//!
//! This crate provides password hashing, JWT session tokens, the
//! authentication middleware gate and the signup/login flows.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use error::AuthError;
pub use jwt::{Claims, TOKEN_TTL_SECS, TokenManager};
pub use middleware::{AuthUser, authenticate, require_auth};
pub use password::{hash_password, verify_password};
pub use service::{LoginOutcome, Signup, login, signup};
