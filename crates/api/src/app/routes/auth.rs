use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::middleware;

pub fn public_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignupRequest>,
) -> axum::response::Response {
    match services.register_user(body).await {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.authenticate(&body.email, &body.password, Utc::now()).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "Login successful",
                "access_token": outcome.access_token,
                "refresh_token": outcome.refresh_token,
                "user": {
                    "uid": outcome.user.id.to_string(),
                    "email": outcome.user.email,
                },
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Exchange a refresh token (presented as the bearer token) for a fresh
/// access token. Public: the refresh token itself is the credential.
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = match middleware::extract_bearer(&headers) {
        Ok(t) => t,
        Err(status) => {
            return errors::json_error(status, "missing_token", "bearer refresh token required");
        }
    };

    match services.refresh_access_token(token, Utc::now()).await {
        Ok(access_token) => (
            StatusCode::OK,
            Json(serde_json::json!({ "access_token": access_token })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    services.revoke_token(user.jti(), user.token_expires_at());
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "logged out" })),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    match services.get_user(user.user_id()).await {
        Ok(record) => (StatusCode::OK, Json(dto::user_to_json(&record))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
