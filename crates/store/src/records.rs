//! Persisted record types.
//!
//! These are storage-shaped structs, not API DTOs; the API layer decides what
//! is serialized out (`password_hash` never leaves this boundary).

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use bookly_core::{BookId, UserId};

/// A user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A book row. `owner_id` references the creating user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: BookId,
    pub owner_id: UserId,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing window. Construct via [`Page::new`] to keep the cap enforced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Internal: sqlx row shapes, converted at the boundary so core id newtypes
/// stay free of database concerns.
pub(crate) mod rows {
    use super::*;

    #[derive(Debug, sqlx::FromRow)]
    pub struct UserRow {
        pub id: Uuid,
        pub username: String,
        pub email: String,
        pub password_hash: String,
        pub first_name: String,
        pub last_name: String,
        pub is_verified: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<UserRow> for UserRecord {
        fn from(r: UserRow) -> Self {
            Self {
                id: UserId::from_uuid(r.id),
                username: r.username,
                email: r.email,
                password_hash: r.password_hash,
                first_name: r.first_name,
                last_name: r.last_name,
                is_verified: r.is_verified,
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        }
    }

    #[derive(Debug, sqlx::FromRow)]
    pub struct BookRow {
        pub id: Uuid,
        pub owner_id: Uuid,
        pub title: String,
        pub author: String,
        pub publisher: String,
        pub published_date: NaiveDate,
        pub page_count: i32,
        pub language: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<BookRow> for BookRecord {
        fn from(r: BookRow) -> Self {
            Self {
                id: BookId::from_uuid(r.id),
                owner_id: UserId::from_uuid(r.owner_id),
                title: r.title,
                author: r.author,
                publisher: r.publisher,
                published_date: r.published_date,
                page_count: r.page_count,
                language: r.language,
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        }
    }
}
