//! `bookly-store` — persistence layer.
//!
//! Storage is behind async traits so the API can run against PostgreSQL in
//! production and an in-memory store in development and tests.

pub mod error;
pub mod memory;
pub mod migrate;
pub mod postgres;
pub mod records;
pub mod traits;

pub use error::StoreError;
pub use memory::{InMemoryBookStore, InMemoryUserStore};
pub use migrate::run_migrations;
pub use postgres::{PgBookStore, PgUserStore, connect};
pub use records::{BookRecord, Page, UserRecord};
pub use traits::{BookStore, UserStore};
