//! Admin user model and token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted admin account, created idempotently on first login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    /// Username (unique)
    pub username: String,
    pub email: String,
    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role string, always "admin" in this deployment
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Claims carried inside a signed admin token. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    /// Expiry as unix seconds
    pub exp: i64,
}

impl AdminClaims {
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_claims() {
        let claims = AdminClaims {
            user_id: 1,
            username: "admin".into(),
            role: "admin".into(),
            exp: Utc::now().timestamp() - 60,
        };
        assert!(claims.is_expired());
        assert!(claims.is_admin());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = AdminUser {
            id: 1,
            username: "admin".into(),
            email: "admin@admin.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: "admin".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "admin");
    }
}
