//! Admin authentication
//!
//! One configured admin credential guards the write surface. The first
//! successful login persists the admin account (with an Argon2 hash of the
//! password); later logins verify against the stored hash. When the
//! configured password is rotated, the first login with the new password
//! replaces the stored hash, revoking the old one. Sessions are stateless:
//! an HMAC-SHA256 signed token carries the claims, nothing is stored.

use crate::config::AuthConfig;
use crate::db::repositories::AdminUserRepository;
use crate::models::{AdminClaims, AdminUser};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Successful login result
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminUser,
}

/// Admin authentication service
pub struct AuthService {
    repository: Arc<dyn AdminUserRepository>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Arc<dyn AdminUserRepository>, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Verify credentials and issue a signed token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if username != self.config.admin_username {
            return Err(AuthError::InvalidCredentials);
        }

        let user = match self.repository.get_by_username(username).await? {
            Some(mut user) => {
                if !verify_password(password, &user.password_hash) {
                    // A rotated config password takes over: the stored hash
                    // is replaced and the old password stops working.
                    if password != self.config.admin_password {
                        return Err(AuthError::InvalidCredentials);
                    }
                    let hash = hash_password(password)?;
                    self.repository.update_password_hash(user.id, &hash).await?;
                    user.password_hash = hash;
                    tracing::info!(username, "Admin password updated from configuration");
                }
                user
            }
            None => {
                // First login bootstraps the persisted account.
                if password != self.config.admin_password {
                    return Err(AuthError::InvalidCredentials);
                }
                let hash = hash_password(password)?;
                let user = self
                    .repository
                    .create(username, "admin@localhost", &hash, "admin")
                    .await?;
                tracing::info!(username, "Admin account created on first login");
                user
            }
        };

        let claims = AdminClaims {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            exp: (Utc::now() + Duration::days(self.config.token_days)).timestamp(),
        };
        let token = self.sign(&claims)?;

        tracing::info!(username = %user.username, "Admin logged in");
        Ok(LoginResponse { token, user })
    }

    /// Validate a token's signature and expiry, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(AuthError::InvalidToken)?;

        let payload = BASE64URL_NOPAD
            .decode(payload_b64.as_bytes())
            .map_err(|_| AuthError::InvalidToken)?;
        let signature = BASE64URL_NOPAD
            .decode(signature_b64.as_bytes())
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .context("Failed to initialize HMAC")?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let claims: AdminClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;
        if claims.is_expired() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    fn sign(&self, claims: &AdminClaims) -> Result<String, AuthError> {
        let payload = serde_json::to_vec(claims).context("Failed to encode claims")?;

        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .context("Failed to initialize HMAC")?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            BASE64URL_NOPAD.encode(&payload),
            BASE64URL_NOPAD.encode(&signature)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxAdminUserRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> AuthService {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        AuthService::new(
            SqlxAdminUserRepository::boxed(pool),
            AuthConfig {
                secret: "test-secret".to_string(),
                admin_username: "admin".to_string(),
                admin_password: "hunter2".to_string(),
                token_days: 7,
            },
        )
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let service = setup().await;
        let response = service.login("admin", "hunter2").await.expect("login");

        let claims = service.verify_token(&response.token).expect("verify");
        assert_eq!(claims.username, "admin");
        assert!(claims.is_admin());
        assert!(!claims.is_expired());
    }

    #[tokio::test]
    async fn test_first_login_persists_account() {
        let service = setup().await;
        service.login("admin", "hunter2").await.expect("first");

        let user = service
            .repository
            .get_by_username("admin")
            .await
            .expect("get")
            .expect("persisted");
        assert!(user.password_hash.starts_with("$argon2"));

        // Second login verifies against the stored hash.
        service.login("admin", "hunter2").await.expect("second");
    }

    #[tokio::test]
    async fn test_rotated_config_password_replaces_hash() {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        let config = AuthConfig {
            secret: "test-secret".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "old-password".to_string(),
            token_days: 7,
        };
        let service = AuthService::new(SqlxAdminUserRepository::boxed(pool.clone()), config.clone());
        service.login("admin", "old-password").await.expect("bootstrap");

        // Restart with a rotated credential.
        let rotated = AuthService::new(
            SqlxAdminUserRepository::boxed(pool),
            AuthConfig {
                admin_password: "new-password".to_string(),
                ..config
            },
        );
        rotated
            .login("admin", "new-password")
            .await
            .expect("login with rotated password");

        // The stored hash was replaced; the old password no longer works.
        assert!(matches!(
            rotated.login("admin", "old-password").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));
        let user = rotated
            .repository
            .get_by_username("admin")
            .await
            .expect("get")
            .expect("persisted");
        assert!(verify_password("new-password", &user.password_hash));
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let service = setup().await;
        assert!(matches!(
            service.login("admin", "wrong").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            service.login("root", "hunter2").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let service = setup().await;
        let response = service.login("admin", "hunter2").await.expect("login");

        let mut tampered = response.token.clone();
        tampered.pop();
        assert!(matches!(
            service.verify_token(&tampered).unwrap_err(),
            AuthError::InvalidToken
        ));
        assert!(matches!(
            service.verify_token("garbage").unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let service = setup().await;
        let claims = AdminClaims {
            user_id: 1,
            username: "admin".to_string(),
            role: "admin".to_string(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = service.sign(&claims).expect("sign");

        assert!(matches!(
            service.verify_token(&token).unwrap_err(),
            AuthError::InvalidToken
        ));
    }
}
