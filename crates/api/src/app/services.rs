//! Business rules behind the HTTP routes.
//!
//! Routes stay thin: they parse/serialize and delegate here. Everything in
//! this module speaks `DomainError`, which `errors.rs` maps to HTTP.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use bookly_auth::{TokenBlocklist, TokenError, TokenSigner, hash_password, verify_password};
use bookly_core::{BookId, DomainError, UserId};
use bookly_store::{BookRecord, BookStore, Page, StoreError, UserRecord, UserStore};

use crate::app::dto;

/// Issued token pair plus the authenticated user.
#[derive(Debug)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

pub struct AppServices {
    users: Arc<dyn UserStore>,
    books: Arc<dyn BookStore>,
    signer: Arc<TokenSigner>,
    blocklist: Arc<dyn TokenBlocklist>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl AppServices {
    pub fn new(
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        signer: Arc<TokenSigner>,
        blocklist: Arc<dyn TokenBlocklist>,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            books,
            signer,
            blocklist,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    // -------------------------
    // Users & auth
    // -------------------------

    pub async fn register_user(&self, req: dto::SignupRequest) -> Result<UserRecord, DomainError> {
        validate_username(&req.username)?;
        validate_email(&req.email)?;
        validate_password(&req.password)?;

        let password_hash = hash_password(&req.password)
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))?;

        let now = Utc::now();
        let user = UserRecord {
            id: UserId::new(),
            username: req.username,
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(&user).await.map_err(store_err)?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, DomainError> {
        let user = self
            .users
            .get_by_email(email)
            .await
            .map_err(store_err)?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| DomainError::internal(format!("password verification failed: {e}")))?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        let (access_token, _) = self
            .signer
            .issue(user.id, &user.email, self.access_token_ttl, false, now)
            .map_err(token_issue_err)?;
        let (refresh_token, _) = self
            .signer
            .issue(user.id, &user.email, self.refresh_token_ttl, true, now)
            .map_err(token_issue_err)?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let claims = self
            .signer
            .verify(refresh_token, now)
            .map_err(|_| DomainError::InvalidCredentials)?;

        if !claims.refresh || self.blocklist.is_revoked(&claims.jti, now) {
            return Err(DomainError::InvalidCredentials);
        }

        let (access_token, _) = self
            .signer
            .issue(claims.sub, &claims.email, self.access_token_ttl, false, now)
            .map_err(token_issue_err)?;
        Ok(access_token)
    }

    /// Revoke the presented token until its natural expiry (logout).
    pub fn revoke_token(&self, jti: uuid::Uuid, expires_at: DateTime<Utc>) {
        self.blocklist.revoke(jti, expires_at);
        tracing::info!(%jti, "token revoked");
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserRecord, DomainError> {
        self.users
            .get(id)
            .await
            .map_err(store_err)?
            .ok_or(DomainError::NotFound)
    }

    pub async fn update_profile(
        &self,
        id: UserId,
        req: dto::UpdateProfileRequest,
    ) -> Result<UserRecord, DomainError> {
        let mut user = self.get_user(id).await?;

        if let Some(username) = req.username {
            validate_username(&username)?;
            user.username = username;
        }
        if let Some(first_name) = req.first_name {
            validate_name("first_name", &first_name)?;
            user.first_name = first_name;
        }
        if let Some(last_name) = req.last_name {
            validate_name("last_name", &last_name)?;
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();

        self.users.update(&user).await.map_err(store_err)?;
        Ok(user)
    }

    // -------------------------
    // Books
    // -------------------------

    pub async fn create_book(
        &self,
        owner: UserId,
        req: dto::CreateBookRequest,
    ) -> Result<BookRecord, DomainError> {
        validate_book_fields(&req.title, &req.author, req.page_count)?;

        // Owner must exist; the token may outlive the account.
        self.get_user(owner).await?;

        let now = Utc::now();
        let book = BookRecord {
            id: BookId::new(),
            owner_id: owner,
            title: req.title,
            author: req.author,
            publisher: req.publisher,
            published_date: req.published_date,
            page_count: req.page_count,
            language: req.language,
            created_at: now,
            updated_at: now,
        };

        self.books.insert(&book).await.map_err(store_err)?;
        Ok(book)
    }

    pub async fn get_book(&self, id: BookId) -> Result<BookRecord, DomainError> {
        self.books
            .get(id)
            .await
            .map_err(store_err)?
            .ok_or(DomainError::NotFound)
    }

    pub async fn list_books(&self, page: Page) -> Result<Vec<BookRecord>, DomainError> {
        self.books.list(page).await.map_err(store_err)
    }

    pub async fn update_book(
        &self,
        caller: UserId,
        id: BookId,
        req: dto::UpdateBookRequest,
    ) -> Result<BookRecord, DomainError> {
        let mut book = self.get_book(id).await?;
        if book.owner_id != caller {
            return Err(DomainError::Forbidden);
        }

        if let Some(title) = req.title {
            book.title = title;
        }
        if let Some(author) = req.author {
            book.author = author;
        }
        if let Some(publisher) = req.publisher {
            book.publisher = publisher;
        }
        if let Some(published_date) = req.published_date {
            book.published_date = published_date;
        }
        if let Some(page_count) = req.page_count {
            book.page_count = page_count;
        }
        if let Some(language) = req.language {
            book.language = language;
        }
        validate_book_fields(&book.title, &book.author, book.page_count)?;
        book.updated_at = Utc::now();

        self.books.update(&book).await.map_err(store_err)?;
        Ok(book)
    }

    pub async fn delete_book(&self, caller: UserId, id: BookId) -> Result<(), DomainError> {
        let book = self.get_book(id).await?;
        if book.owner_id != caller {
            return Err(DomainError::Forbidden);
        }

        let deleted = self.books.delete(id).await.map_err(store_err)?;
        if !deleted {
            // Raced with another delete.
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

fn store_err(e: StoreError) -> DomainError {
    match e {
        StoreError::NotFound => DomainError::NotFound,
        StoreError::Conflict(field) => DomainError::conflict(format!("{field} already in use")),
        StoreError::Database(e) => DomainError::internal(e.to_string()),
    }
}

fn token_issue_err(e: TokenError) -> DomainError {
    DomainError::internal(format!("token issuing failed: {e}"))
}

// -------------------------
// Validation rules
// -------------------------

fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    if trimmed.len() > 254 || !trimmed.contains('@') || trimmed.starts_with('@') {
        return Err(DomainError::validation("email is not a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.len() < 8 {
        return Err(DomainError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(DomainError::validation(
            "username must be between 3 and 32 characters",
        ));
    }
    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() || value.chars().count() > 64 {
        return Err(DomainError::validation(format!(
            "{field} must be non-empty and at most 64 characters"
        )));
    }
    Ok(())
}

fn validate_book_fields(title: &str, author: &str, page_count: i32) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if author.trim().is_empty() {
        return Err(DomainError::validation("author must not be empty"));
    }
    if page_count < 1 {
        return Err(DomainError::validation("page_count must be at least 1"));
    }
    Ok(())
}
