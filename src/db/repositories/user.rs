//! Admin user repository

use crate::models::AdminUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Admin user repository trait
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    /// Look up by username
    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>>;

    /// Insert an admin account
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<AdminUser>;

    /// Replace a user's password hash
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<()>;
}

/// SQLx-based admin user repository implementation
pub struct SqlxAdminUserRepository {
    pool: SqlitePool,
}

impl SqlxAdminUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn AdminUserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AdminUserRepository for SqlxAdminUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        let row = sqlx::query("SELECT * FROM admin_users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get admin user")?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<AdminUser> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO admin_users (username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create admin user")?;

        Ok(AdminUser {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            created_at: now,
        })
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE admin_users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update admin password hash")?;

        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AdminUser {
    AdminUser {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxAdminUserRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxAdminUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;
        let created = repo
            .create("admin", "admin@admin.com", "$argon2id$hash", "admin")
            .await
            .expect("create");

        let found = repo
            .get_by_username("admin")
            .await
            .expect("get")
            .expect("some");
        assert_eq!(found.id, created.id);
        assert!(found.is_admin());
        assert_eq!(found.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let repo = setup().await;
        assert!(repo.get_by_username("nobody").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = setup().await;
        repo.create("admin", "a@a.com", "h1", "admin")
            .await
            .expect("create");
        assert!(repo.create("admin", "b@b.com", "h2", "admin").await.is_err());
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let repo = setup().await;
        let user = repo
            .create("admin", "a@a.com", "old", "admin")
            .await
            .expect("create");

        repo.update_password_hash(user.id, "new")
            .await
            .expect("update");

        let found = repo
            .get_by_username("admin")
            .await
            .expect("get")
            .expect("some");
        assert_eq!(found.password_hash, "new");
    }
}
