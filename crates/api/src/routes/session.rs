//! Login, logout and session checks for administrators and shoppers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use temple_core::auth::{IssuedSession, Role, SessionIdentity};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/logout", post(admin_logout))
        .route("/api/admin/verify", get(verify))
        .route("/api/auth/login", post(shopper_login))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

fn session_body(session: IssuedSession) -> Json<Value> {
    Json(json!({
        "success": true,
        "token": session.token,
        "expiresAt": session.expires_at,
        "user": session.user,
    }))
}

async fn admin_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(LoginRequest { email, password }) = body?;
    let guard = state.guard().clone();
    // Argon2 verification is CPU-bound.
    let session = tokio::task::spawn_blocking(move || guard.login_admin(&email, &password))
        .await
        .map_err(|e| ApiError::Internal(format!("login task failed: {e}")))??;
    Ok(session_body(session))
}

async fn admin_logout(
    State(state): State<AppState>,
    RequireAdmin { admin, token }: RequireAdmin,
) -> ApiResult<Json<Value>> {
    state.guard().revoke(&token)?;
    tracing::info!(admin = %admin.email, "admin logged out");
    Ok(Json(json!({ "success": true })))
}

async fn verify(RequireAdmin { admin, .. }: RequireAdmin) -> Json<Value> {
    let user = SessionIdentity {
        email: admin.email,
        role: Role::Admin,
    };
    Json(json!({ "success": true, "user": user }))
}

async fn shopper_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(LoginRequest { email, password }) = body?;
    let session = state
        .guard()
        .login_shopper(state.store().as_ref(), &email, &password)
        .await?;
    tracing::info!(email = %session.user.email, "shopper logged in");
    Ok(session_body(session))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;
    use temple_core::auth::password::hash_password;
    use temple_core::auth::{GuardSettings, SessionGuard};
    use temple_core::bookings::User;
    use temple_core::cart::MemoryCartStorage;
    use temple_core::events::bus::EventBus;
    use temple_core::store::memory::MemoryStore;

    use crate::config::AppConfig;
    use crate::routes::build_router;
    use crate::routes::testing::{request, send};
    use crate::state::AppState;

    async fn app_with_accounts() -> axum::Router {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_user(
                User {
                    id: 1,
                    email: "sita@example.com".into(),
                    name: Some("Sita".into()),
                    phone: None,
                    created_at: Utc::now(),
                },
                hash_password("tulsi").unwrap(),
            )
            .await;
        let config = AppConfig::for_tests();
        let guard = SessionGuard::new(GuardSettings {
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: chrono::Duration::hours(1),
            admin_email: config.admin_email.clone(),
            admin_password_hash: Some(hash_password("om-namah").unwrap()),
        });
        build_router(AppState::new(
            store,
            Arc::new(MemoryCartStorage::new()),
            guard,
            config,
            EventBus::new(8),
        ))
    }

    #[tokio::test]
    async fn admin_login_verify_logout() {
        let app = app_with_accounts().await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/admin/login",
                None,
                Some(json!({ "email": "admin@temple.local", "password": "om-namah" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "admin");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, request("GET", "/api/admin/verify", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "admin@temple.local");

        let (status, _) = send(&app, request("POST", "/api/admin/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, request("GET", "/api/admin/verify", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_credentials_are_401() {
        let app = app_with_accounts().await;
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/admin/login",
                None,
                Some(json!({ "email": "admin@temple.local", "password": "wrong" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "unauthorized");

        let (status, _) = send(
            &app,
            request("POST", "/api/admin/login", None, Some(json!({ "email": "x" }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shopper_login_issues_shopper_session() {
        let app = app_with_accounts().await;
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "email": "sita@example.com", "password": "tulsi" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "shopper");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _) = send(&app, request("GET", "/api/admin/verify", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
