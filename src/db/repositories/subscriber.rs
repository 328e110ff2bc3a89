//! Subscriber repository

use crate::models::{Subscriber, SubscriberStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Subscriber repository trait
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Insert a new active subscriber
    async fn create(&self, email: &str, name: Option<&str>) -> Result<Subscriber>;

    /// Look up by email, case-insensitive
    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>>;

    /// List all subscribers, newest first
    async fn list(&self) -> Result<Vec<Subscriber>>;

    /// List subscribers with the given status
    async fn list_by_status(&self, status: SubscriberStatus) -> Result<Vec<Subscriber>>;

    /// Delete a subscriber; returns false when the id was absent
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Counts for the admin stats endpoint: (total, active)
    async fn stats(&self) -> Result<(i64, i64)>;
}

/// SQLx-based subscriber repository implementation
pub struct SqlxSubscriberRepository {
    pool: SqlitePool,
}

impl SqlxSubscriberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn SubscriberRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SubscriberRepository for SqlxSubscriberRepository {
    async fn create(&self, email: &str, name: Option<&str>) -> Result<Subscriber> {
        let now = Utc::now();
        let email = email.to_lowercase();

        let result = sqlx::query(
            "INSERT INTO subscribers (email, name, status, created_at) VALUES (?, ?, 'active', ?)",
        )
        .bind(&email)
        .bind(name)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create subscriber")?;

        Ok(Subscriber {
            id: result.last_insert_rowid(),
            email,
            name: name.map(String::from),
            status: SubscriberStatus::Active,
            created_at: now,
        })
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        let row = sqlx::query("SELECT * FROM subscribers WHERE email = ?")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get subscriber by email")?;

        row.map(|row| row_to_subscriber(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Subscriber>> {
        let rows = sqlx::query("SELECT * FROM subscribers ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list subscribers")?;

        rows.iter().map(row_to_subscriber).collect()
    }

    async fn list_by_status(&self, status: SubscriberStatus) -> Result<Vec<Subscriber>> {
        let rows = sqlx::query("SELECT * FROM subscribers WHERE status = ? ORDER BY created_at DESC")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list subscribers by status")?;

        rows.iter().map(row_to_subscriber).collect()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete subscriber")?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<(i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END) AS active
            FROM subscribers
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to load subscriber stats")?;

        Ok((row.get("total"), row.try_get("active").unwrap_or(0)))
    }
}

fn row_to_subscriber(row: &sqlx::sqlite::SqliteRow) -> Result<Subscriber> {
    let status_str: String = row.get("status");
    let status = SubscriberStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid subscriber status: {}", status_str))?;

    Ok(Subscriber {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        status,
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxSubscriberRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxSubscriberRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_lookup_is_case_insensitive() {
        let repo = setup().await;
        repo.create("Reader@Example.COM", Some("Reader"))
            .await
            .expect("create");

        let found = repo
            .get_by_email("reader@example.com")
            .await
            .expect("get")
            .expect("some");
        assert_eq!(found.email, "reader@example.com");
        assert_eq!(found.name.as_deref(), Some("Reader"));
        assert_eq!(found.status, SubscriberStatus::Active);

        let upper = repo
            .get_by_email("READER@EXAMPLE.COM")
            .await
            .expect("get");
        assert!(upper.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_schema() {
        let repo = setup().await;
        repo.create("one@example.com", None).await.expect("create");
        assert!(repo.create("ONE@example.com", None).await.is_err());
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let repo = setup().await;
        let sub = repo.create("a@example.com", None).await.expect("create");
        repo.create("b@example.com", None).await.expect("create");

        sqlx::query("UPDATE subscribers SET status = 'inactive' WHERE id = ?")
            .bind(sub.id)
            .execute(&repo.pool)
            .await
            .expect("update");

        let active = repo
            .list_by_status(SubscriberStatus::Active)
            .await
            .expect("list");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].email, "b@example.com");

        let (total, active_count) = repo.stats().await.expect("stats");
        assert_eq!((total, active_count), (2, 1));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let sub = repo.create("gone@example.com", None).await.expect("create");

        assert!(repo.delete(sub.id).await.expect("delete"));
        assert!(!repo.delete(sub.id).await.expect("second delete"));
        assert!(repo
            .get_by_email("gone@example.com")
            .await
            .expect("get")
            .is_none());
    }
}
