//! Signup, login and the token-protected identity route

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use taskboard_auth::{AuthUser, Signup, TOKEN_TTL_SECS, require_auth};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::extract::ApiJson;
use super::types::{
    LoginRequest, LoginResponse, MessageResponse, ProtectedResponse, SignupRequest,
};

/// POST /api/signup
async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    taskboard_auth::signup(
        &state.db,
        Signup {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = taskboard_auth::login(
        &state.db,
        &state.tokens,
        request.email.as_deref(),
        request.password.as_deref(),
    )
    .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        expires_in: TOKEN_TTL_SECS,
        user: outcome.user.into(),
    }))
}

/// GET /api/protected
///
/// The identity was established by `require_auth`; it is not re-derived here.
async fn protected(Extension(user): Extension<AuthUser>) -> Json<ProtectedResponse> {
    debug!("Protected route accessed by user {}", user.id);

    Json(ProtectedResponse {
        message: "Access granted".to_string(),
        user,
    })
}

/// Create auth routes
pub fn routes(state: &AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route("/api/protected", get(protected))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .merge(protected_routes)
}
