use chrono::{DateTime, Utc};
use uuid::Uuid;

use bookly_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware; immutable and present for all protected
/// routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user_id: UserId,
    email: String,
    jti: Uuid,
    token_expires_at: DateTime<Utc>,
}

impl CurrentUser {
    pub fn new(user_id: UserId, email: String, jti: Uuid, token_expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            jti,
            token_expires_at,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn jti(&self) -> Uuid {
        self.jti
    }

    pub fn token_expires_at(&self) -> DateTime<Utc> {
        self.token_expires_at
    }
}
