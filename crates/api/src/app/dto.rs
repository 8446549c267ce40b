use chrono::NaiveDate;
use serde::Deserialize;

use bookly_store::{BookRecord, UserRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub page_count: Option<i32>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// -------------------------
// Response mapping
// -------------------------

/// Sanitized user view: `password_hash` never leaves the store boundary.
pub fn user_to_json(user: &UserRecord) -> serde_json::Value {
    serde_json::json!({
        "uid": user.id.to_string(),
        "username": user.username,
        "email": user.email,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "is_verified": user.is_verified,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    })
}

pub fn book_to_json(book: &BookRecord) -> serde_json::Value {
    serde_json::json!({
        "uid": book.id.to_string(),
        "owner_uid": book.owner_id.to_string(),
        "title": book.title,
        "author": book.author,
        "publisher": book.publisher,
        "published_date": book.published_date,
        "page_count": book.page_count,
        "language": book.language,
        "created_at": book.created_at,
        "updated_at": book.updated_at,
    })
}
