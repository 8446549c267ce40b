use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use bookly_auth::{TokenBlocklist, TokenSigner};

use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub signer: Arc<TokenSigner>,
    pub blocklist: Arc<dyn TokenBlocklist>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;
    let now = Utc::now();

    let claims = state
        .signer
        .verify(token, now)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    // Refresh tokens are only good for /auth/refresh.
    if claims.refresh {
        return Err(StatusCode::UNAUTHORIZED);
    }

    if state.blocklist.is_revoked(&claims.jti, now) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut().insert(CurrentUser::new(
        claims.sub,
        claims.email.clone(),
        claims.jti,
        claims.expires_at,
    ));

    Ok(next.run(req).await)
}

pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
