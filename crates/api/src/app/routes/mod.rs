use axum::Router;

pub mod auth;
pub mod books;
pub mod system;
pub mod users;

/// Routes reachable without a token (signup/login/refresh).
pub fn public_router() -> Router {
    Router::new().nest("/auth", auth::public_router())
}

/// Routes behind the bearer-auth middleware.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/users", users::router())
        .nest("/books", books::router())
}
