use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use temple_core::auth::AuthError;
use temple_core::cart::{CartError, PendingAdd};
use temple_core::catalog::CatalogError;
use temple_core::content::ValidationError;
use temple_core::stats::StatsError;
use temple_core::store::StoreError;

/// Where an unauthenticated admin is sent to sign in.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// API error type, rendered as `{"error": {"type", "message", "statusCode"}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("sign in to add service {}", .0.service_id)]
    AuthRequired(PendingAdd),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String, Map<String, Value>) {
        let mut extra = Map::new();
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Validation(err) => {
                extra.insert("field".into(), json!(err.field()));
                (StatusCode::BAD_REQUEST, "validationError", err.to_string())
            }
            ApiError::Unauthorized => {
                extra.insert("login".into(), json!(ADMIN_LOGIN_PATH));
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Authentication required".to_string(),
                )
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid email or password".to_string(),
            ),
            ApiError::AuthRequired(pending) => {
                extra.insert("pending".into(), json!(pending));
                extra.insert(
                    "redirect".into(),
                    json!(format!(
                        "/auth/login?redirect=/services&serviceId={}",
                        pending.service_id
                    )),
                );
                (
                    StatusCode::UNAUTHORIZED,
                    "authRequired",
                    "Please sign in to add services to your cart".to_string(),
                )
            }
            ApiError::StoreUnavailable(msg) => {
                tracing::warn!("Store unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storeUnavailable",
                    "The data store is temporarily unavailable".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };
        (status, error_type, message, extra)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, extra) = self.parts();

        let mut error = Map::new();
        error.insert("type".into(), json!(error_type));
        error.insert("message".into(), json!(message));
        error.insert("statusCode".into(), json!(status.as_u16()));
        error.extend(extra);

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            ApiError::StoreUnavailable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(err) => ApiError::Validation(err),
            CatalogError::NotFound(id) => ApiError::NotFound(format!("no catalog entry with id {id}")),
            CatalogError::Store(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => ApiError::Unauthorized,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Store(err) => err.into(),
            AuthError::Token(_) | AuthError::PasswordHash(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Store(err) => err.into(),
            StatsError::Calendar(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
