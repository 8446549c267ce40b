//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store/signer wiring and the business rules behind routes
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use bookly_auth::{InMemoryBlocklist, TokenBlocklist, TokenSigner};
use bookly_store::{
    BookStore, InMemoryBookStore, InMemoryUserStore, PgBookStore, PgUserStore, UserStore, connect,
    run_migrations,
};

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// With `DATABASE_URL` set this connects to PostgreSQL and applies all
/// unapplied migrations in order; otherwise it falls back to in-memory
/// stores for development and tests.
pub async fn build_app(config: Config) -> anyhow::Result<Router> {
    let signer = Arc::new(TokenSigner::new(config.jwt_secret.as_bytes()));
    let blocklist: Arc<dyn TokenBlocklist> = Arc::new(InMemoryBlocklist::new());

    let (users, books): (Arc<dyn UserStore>, Arc<dyn BookStore>) = match &config.database_url {
        Some(url) => {
            let pool = connect(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("connected to postgres; migrations applied");
            (
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgBookStore::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores (state is not persisted)");
            (
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryBookStore::new()),
            )
        }
    };

    let services = Arc::new(services::AppServices::new(
        users,
        books,
        signer.clone(),
        blocklist.clone(),
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));

    let auth_state = middleware::AuthState { signer, blocklist };

    // Protected routes: require a valid, non-revoked access token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", routes::public_router().merge(protected))
        .layer(Extension(services)))
}
