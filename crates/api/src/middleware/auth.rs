//! Request extractors for sessions and carts.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use temple_core::auth::{AdminIdentity, SessionIdentity};

use crate::error::ApiError;
use crate::state::AppState;

/// Header naming the client's cart session.
pub const CART_SESSION_HEADER: &str = "x-cart-session";

async fn bearer_token(parts: &mut Parts, state: &AppState) -> Option<String> {
    let TypedHeader(auth) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()?;
    let token = auth.token().trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Passes only for a valid administrator session; anything else is a 401
/// before the handler runs.
pub struct RequireAdmin {
    pub admin: AdminIdentity,
    pub token: String,
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await
            .ok_or(ApiError::Unauthorized)?;
        let admin = state.guard().verify(&token)?;
        Ok(Self { admin, token })
    }
}

/// The caller's session, if a valid one was presented.
pub struct MaybeSession(pub Option<SessionIdentity>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts, state).await else {
            return Ok(Self(None));
        };
        Ok(Self(state.guard().identify(&token).ok()))
    }
}

/// Client-chosen cart session id from the `x-cart-session` header.
pub struct CartSession(pub String);

fn valid_session_id(id: &str) -> bool {
    (1..=128).contains(&id.len())
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl<S: Send + Sync> FromRequestParts<S> for CartSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(CART_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .ok_or_else(|| ApiError::BadRequest(format!("missing {CART_SESSION_HEADER} header")))?;
        if !valid_session_id(id) {
            return Err(ApiError::BadRequest(format!(
                "{CART_SESSION_HEADER} must be 1-128 letters, digits, '-' or '_'"
            )));
        }
        Ok(Self(id.to_string()))
    }
}
