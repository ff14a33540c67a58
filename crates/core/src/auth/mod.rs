//! Session guard for administrators and shoppers.

pub mod guard;
pub mod password;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

pub use guard::{GuardSettings, IssuedSession, SessionGuard};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Shopper,
}

/// Who a valid session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub email: String,
    pub role: Role,
}

/// Proof that the admin guard passed. Only the guard hands these out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdentity {
    pub email: String,
}

impl AdminIdentity {
    pub(crate) fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}
