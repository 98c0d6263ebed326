//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskboard_db::UserRole;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::jwt::{Claims, TokenManager};

/// Authenticated user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

impl TryFrom<&Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let role = claims.role.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(Self { id, role })
    }
}

/// Extract the token from the authorization header value
///
/// Clients send the token unprefixed; a `Bearer ` prefix is tolerated.
fn extract_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication gate
///
/// Either yields the identity asserted by the request's token or the reason
/// the request must be rejected.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenManager) -> Result<AuthUser, AuthError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingToken);
    };
    if header.is_empty() {
        return Err(AuthError::MissingToken);
    }

    // Present but not visible ASCII cannot be a token we issued
    let value = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    let token = extract_token(value).ok_or(AuthError::MissingToken)?;

    tokens.verify(token)
}

/// Authentication middleware
///
/// Runs the gate in front of the wrapped handler. On success the `AuthUser` is
/// added to request extensions; otherwise the handler never runs.
pub async fn require_auth(
    State(tokens): State<Arc<TokenManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(request.headers(), &tokens).inspect_err(|e| {
        metrics::counter!("taskboard_auth_rejections_total").increment(1);
        warn!("Rejected request to {}: {}", request.uri().path(), e);
    })?;

    debug!("Authenticated user: {} ({:?})", user.id, user.role.as_str());

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    fn tokens() -> TokenManager {
        TokenManager::new("middleware-secret").unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        let result = authenticate(&HeaderMap::new(), &tokens());
        assert!(matches!(result, Err(AuthError::MissingToken)));

        let result = authenticate(&headers_with(""), &tokens());
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_unprefixed_and_bearer_tokens_accepted() {
        let tokens = tokens();
        let token = tokens.issue(9, UserRole::User).unwrap();

        let user = authenticate(&headers_with(&token), &tokens).unwrap();
        assert_eq!(user, AuthUser { id: 9, role: UserRole::User });

        let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap();
        assert_eq!(user.id, 9);
    }

    #[test]
    fn test_invalid_token() {
        let result = authenticate(&headers_with("not-a-token"), &tokens());
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_non_ascii_header_is_invalid_not_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            axum::http::HeaderValue::from_bytes("tök".as_bytes()).unwrap(),
        );

        let result = authenticate(&headers, &tokens());
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_claims_with_bad_subject_rejected() {
        let claims = Claims {
            sub: "abc".to_string(),
            role: "user".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(matches!(AuthUser::try_from(&claims), Err(AuthError::InvalidToken)));

        let claims = Claims {
            sub: "1".to_string(),
            role: "root".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(matches!(AuthUser::try_from(&claims), Err(AuthError::InvalidToken)));
    }

    fn app(tokens: Arc<TokenManager>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthUser>| async move { user.id.to_string() }),
            )
            .layer(from_fn_with_state(tokens, require_auth))
    }

    #[tokio::test]
    async fn test_middleware_short_circuits_without_token() {
        let response = app(Arc::new(tokens()))
            .oneshot(HttpRequest::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_passes_identity_to_handler() {
        let tokens = Arc::new(tokens());
        let token = tokens.issue(11, UserRole::Admin).unwrap();

        let response = app(tokens)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
