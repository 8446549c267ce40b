//! `bookly-auth` — authentication boundary: tokens, passwords, revocation.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod blocklist;
pub mod claims;
pub mod password;
pub mod token;

pub use blocklist::{InMemoryBlocklist, TokenBlocklist};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use token::{TokenError, TokenSigner};
