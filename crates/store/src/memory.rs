//! In-memory stores for development and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use bookly_core::{BookId, UserId};

use crate::error::StoreError;
use crate::records::{BookRecord, Page, UserRecord};
use crate::traits::{BookStore, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: Mutex<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if map.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email"));
        }
        if map.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username"));
        }
        map.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(id.as_uuid()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if !map.contains_key(user.id.as_uuid()) {
            return Err(StoreError::NotFound);
        }
        if map
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(StoreError::Conflict("username"));
        }
        if map.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(StoreError::Conflict("email"));
        }
        map.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: Mutex<HashMap<Uuid, BookRecord>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn insert(&self, book: &BookRecord) -> Result<(), StoreError> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(*book.id.as_uuid(), book.clone());
        Ok(())
    }

    async fn get(&self, id: BookId) -> Result<Option<BookRecord>, StoreError> {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(id.as_uuid()).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<BookRecord>, StoreError> {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut books: Vec<BookRecord> = map.values().cloned().collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(books
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .collect())
    }

    async fn update(&self, book: &BookRecord) -> Result<(), StoreError> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if !map.contains_key(book.id.as_uuid()) {
            return Err(StoreError::NotFound);
        }
        map.insert(*book.id.as_uuid(), book.clone());
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<bool, StoreError> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.remove(id.as_uuid()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn user(email: &str, username: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn book(owner: UserId, title: &str) -> BookRecord {
        let now = Utc::now();
        BookRecord {
            id: BookId::new(),
            owner_id: owner,
            title: title.to_string(),
            author: "Author".to_string(),
            publisher: "Publisher".to_string(),
            published_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            page_count: 100,
            language: "en".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.insert(&user("a@x.com", "ada")).await.unwrap();
        let err = store.insert(&user("a@x.com", "grace")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("email")));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = InMemoryUserStore::new();
        store.insert(&user("a@x.com", "ada")).await.unwrap();
        let err = store.insert(&user("b@x.com", "ada")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("username")));
    }

    #[tokio::test]
    async fn get_by_email_finds_the_inserted_user() {
        let store = InMemoryUserStore::new();
        let u = user("a@x.com", "ada");
        store.insert(&u).await.unwrap();
        assert_eq!(store.get_by_email("a@x.com").await.unwrap(), Some(u));
        assert_eq!(store.get_by_email("missing@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_rejects_username_taken_by_another_user() {
        let store = InMemoryUserStore::new();
        store.insert(&user("a@x.com", "ada")).await.unwrap();
        let mut other = user("b@x.com", "grace");
        store.insert(&other).await.unwrap();

        other.username = "ada".to_string();
        let err = store.update(&other).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("username")));
    }

    #[tokio::test]
    async fn books_list_newest_first_with_paging() {
        let store = InMemoryBookStore::new();
        let owner = UserId::new();

        let mut older = book(owner, "older");
        older.created_at = Utc::now() - Duration::seconds(10);
        let newer = book(owner, "newer");

        store.insert(&older).await.unwrap();
        store.insert(&newer).await.unwrap();

        let listed = store.list(Page::default()).await.unwrap();
        assert_eq!(listed[0].title, "newer");
        assert_eq!(listed[1].title, "older");

        let second_page = store
            .list(Page { limit: 1, offset: 1 })
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].title, "older");
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_matched() {
        let store = InMemoryBookStore::new();
        let b = book(UserId::new(), "t");
        store.insert(&b).await.unwrap();
        assert!(store.delete(b.id).await.unwrap());
        assert!(!store.delete(b.id).await.unwrap());
        assert_eq!(store.get(b.id).await.unwrap(), None);
    }
}
