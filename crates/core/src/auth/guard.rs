use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Store;

use super::password::verify_password;
use super::{AdminIdentity, AuthError, Role, SessionIdentity};

#[derive(Debug, Clone)]
pub struct GuardSettings {
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub admin_email: String,
    /// Argon2 PHC string. Admin login is disabled when absent.
    pub admin_password_hash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
    jti: String,
}

/// A freshly issued session token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionIdentity,
}

/// Issues and verifies signed session tokens.
///
/// Tokens are HS256 JWTs. Logout records the token id in a revocation list
/// kept until the token would have expired anyway.
#[derive(Clone)]
pub struct SessionGuard {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    admin_email: String,
    admin_password_hash: Option<String>,
    revoked: Arc<Mutex<HashMap<String, i64>>>,
}

impl SessionGuard {
    pub fn new(settings: GuardSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            validation,
            ttl: settings.session_ttl,
            admin_email: settings.admin_email,
            admin_password_hash: settings.admin_password_hash,
            revoked: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn issue(&self, email: &str, role: Role) -> Result<IssuedSession, AuthError> {
        self.issue_at(email, role, Utc::now())
    }

    fn issue_at(
        &self,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AuthError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedSession {
            token,
            expires_at,
            user: SessionIdentity {
                email: claims.sub,
                role,
            },
        })
    }

    fn claims(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!("rejected session token: {e}");
                AuthError::Unauthenticated
            })?
            .claims;
        if self.revoked_ids().contains_key(&claims.jti) {
            return Err(AuthError::Unauthenticated);
        }
        Ok(claims)
    }

    /// Any valid, unrevoked session.
    pub fn identify(&self, token: &str) -> Result<SessionIdentity, AuthError> {
        let claims = self.claims(token)?;
        Ok(SessionIdentity {
            email: claims.sub,
            role: claims.role,
        })
    }

    /// The admin guard: passes only for a valid administrator session.
    pub fn verify(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        let identity = self.identify(token)?;
        if identity.role != Role::Admin {
            return Err(AuthError::Unauthenticated);
        }
        Ok(AdminIdentity::new(identity.email))
    }

    /// Invalidate a token before its expiry.
    pub fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.claims(token)?;
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked_ids();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti, claims.exp);
        Ok(())
    }

    fn revoked_ids(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.revoked.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn login_admin(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let Some(hash) = &self.admin_password_hash else {
            tracing::warn!("admin login attempted but no admin password is configured");
            return Err(AuthError::InvalidCredentials);
        };
        if !email.eq_ignore_ascii_case(&self.admin_email) || !verify_password(password, hash)? {
            tracing::info!(email, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        tracing::info!(email, "admin logged in");
        self.issue(&self.admin_email, Role::Admin)
    }

    pub async fn login_shopper(
        &self,
        store: &dyn Store,
        email: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthError> {
        let credentials = store
            .find_user_credentials(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &credentials.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        self.issue(&credentials.email, Role::Shopper)
    }
}
