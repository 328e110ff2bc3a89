//! Contact message repository

use crate::models::{ContactMessage, ContactStatus, CreateContactInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Contact message repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a new message with status `new`
    async fn create(&self, input: &CreateContactInput) -> Result<ContactMessage>;

    /// List all messages, newest first
    async fn list(&self) -> Result<Vec<ContactMessage>>;

    /// Update a message's triage status; returns false when the id was absent
    async fn update_status(&self, id: i64, status: ContactStatus) -> Result<bool>;

    /// Delete a message; returns false when the id was absent
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based contact message repository implementation
pub struct SqlxContactRepository {
    pool: SqlitePool,
}

impl SqlxContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, input: &CreateContactInput) -> Result<ContactMessage> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO contact_messages (name, email, company, partnership_type, message, status, created_at)
            VALUES (?, ?, ?, ?, ?, 'new', ?)
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.company)
        .bind(&input.partnership_type)
        .bind(&input.message)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create contact message")?;

        Ok(ContactMessage {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            email: input.email.clone(),
            company: input.company.clone(),
            partnership_type: input.partnership_type.clone(),
            message: input.message.clone(),
            status: ContactStatus::New,
            created_at: now,
        })
    }

    async fn list(&self) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query("SELECT * FROM contact_messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list contact messages")?;

        rows.iter().map(row_to_message).collect()
    }

    async fn update_status(&self, id: i64, status: ContactStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE contact_messages SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update contact message status")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete contact message")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<ContactMessage> {
    let status_str: String = row.get("status");
    let status = ContactStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid contact status: {}", status_str))?;

    Ok(ContactMessage {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        company: row.get("company"),
        partnership_type: row.get("partnership_type"),
        message: row.get("message"),
        status,
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxContactRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxContactRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = setup().await;
        let created = repo
            .create(&CreateContactInput {
                name: "Partner Co".to_string(),
                email: "hello@partner.example".to_string(),
                company: Some("Partner Co".to_string()),
                partnership_type: Some("sponsorship".to_string()),
                message: "We would like to sponsor a series".to_string(),
            })
            .await
            .expect("create");

        assert_eq!(created.status, ContactStatus::New);

        let all = repo.list().await.expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].partnership_type.as_deref(), Some("sponsorship"));
    }

    #[tokio::test]
    async fn test_status_update_and_delete() {
        let repo = setup().await;
        let created = repo
            .create(&CreateContactInput {
                name: "Reader".to_string(),
                email: "reader@example.com".to_string(),
                company: None,
                partnership_type: None,
                message: "Question about ETFs".to_string(),
            })
            .await
            .expect("create");

        assert!(repo
            .update_status(created.id, ContactStatus::Read)
            .await
            .expect("update"));
        let all = repo.list().await.expect("list");
        assert_eq!(all[0].status, ContactStatus::Read);

        assert!(repo.delete(created.id).await.expect("delete"));
        assert!(!repo.update_status(created.id, ContactStatus::Responded).await.expect("update gone"));
    }
}
