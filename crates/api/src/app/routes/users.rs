use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::patch,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route("/me", patch(update_me))
}

pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::UpdateProfileRequest>,
) -> axum::response::Response {
    match services.update_profile(user.user_id(), body).await {
        Ok(updated) => (StatusCode::OK, Json(dto::user_to_json(&updated))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
