//! Storage trait seams.

use async_trait::async_trait;

use bookly_core::{BookId, UserId};

use crate::error::StoreError;
use crate::records::{BookRecord, Page, UserRecord};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Conflict` on duplicate email or
    /// username.
    async fn insert(&self, user: &UserRecord) -> Result<(), StoreError>;

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Persist an updated user row. Fails with `NotFound` if the row is gone
    /// and `Conflict` on a uniqueness violation.
    async fn update(&self, user: &UserRecord) -> Result<(), StoreError>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert(&self, book: &BookRecord) -> Result<(), StoreError>;

    async fn get(&self, id: BookId) -> Result<Option<BookRecord>, StoreError>;

    /// List books, most recently created first.
    async fn list(&self, page: Page) -> Result<Vec<BookRecord>, StoreError>;

    async fn update(&self, book: &BookRecord) -> Result<(), StoreError>;

    /// Delete a book. Returns `false` if no row matched.
    async fn delete(&self, id: BookId) -> Result<bool, StoreError>;
}
