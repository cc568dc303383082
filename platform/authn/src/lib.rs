//! Platform authentication: local accounts backed by the `app_user` table,
//! argon2 password hashes and HS256 bearer tokens.

mod accounts;
mod token;

pub use accounts::{AccountService, Credentials, Registration, UserProfile};
pub use token::{AuthConfig, SessionClaims, decode_token, issue_token};

use std::collections::BTreeMap;

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("invalid registration")]
    InvalidRegistration(BTreeMap<String, String>),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("token expired")]
    TokenExpired,
    #[error("failed to issue token: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

pub type AuthnResult<T> = Result<T, AuthnError>;
