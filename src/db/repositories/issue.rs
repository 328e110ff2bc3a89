//! Newsletter issue repository

use crate::models::{CreateIssueInput, IssueStatus, IssueSummary, NewsletterIssue};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Newsletter issue repository trait
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Store an uploaded issue
    async fn create(&self, input: &CreateIssueInput) -> Result<NewsletterIssue>;

    /// Get a full issue record including the file payload
    async fn get_by_id(&self, id: i64) -> Result<Option<NewsletterIssue>>;

    /// List issue summaries, newest issue date first
    async fn list(&self, published_only: bool) -> Result<Vec<IssueSummary>>;

    /// Record the outcome of a send operation
    async fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>, sent_count: i64) -> Result<()>;

    /// Delete an issue; returns false when the id was absent
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Total issue count for the admin stats endpoint
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based issue repository implementation
pub struct SqlxIssueRepository {
    pool: SqlitePool,
}

impl SqlxIssueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn IssueRepository> {
        Arc::new(Self::new(pool))
    }
}

const SUMMARY_COLUMNS: &str =
    "id, title, description, file_name, file_size, issue_date, status, sent_at, sent_count, created_at";

#[async_trait]
impl IssueRepository for SqlxIssueRepository {
    async fn create(&self, input: &CreateIssueInput) -> Result<NewsletterIssue> {
        let now = Utc::now();
        let issue_date = input.issue_date.unwrap_or(now);

        let result = sqlx::query(
            r#"
            INSERT INTO newsletter_issues (title, description, file_url, file_name, file_size, issue_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.file_url)
        .bind(&input.file_name)
        .bind(input.file_size)
        .bind(issue_date)
        .bind(input.status.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create newsletter issue")?;

        Ok(NewsletterIssue {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            description: input.description.clone(),
            file_url: input.file_url.clone(),
            file_name: input.file_name.clone(),
            file_size: input.file_size,
            issue_date,
            status: input.status,
            sent_at: None,
            sent_count: None,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<NewsletterIssue>> {
        let row = sqlx::query("SELECT * FROM newsletter_issues WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get newsletter issue")?;

        row.map(|row| row_to_issue(&row)).transpose()
    }

    async fn list(&self, published_only: bool) -> Result<Vec<IssueSummary>> {
        let query = if published_only {
            format!(
                "SELECT {} FROM newsletter_issues WHERE status = 'published' ORDER BY issue_date DESC",
                SUMMARY_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM newsletter_issues ORDER BY issue_date DESC",
                SUMMARY_COLUMNS
            )
        };

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list newsletter issues")?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>, sent_count: i64) -> Result<()> {
        sqlx::query("UPDATE newsletter_issues SET sent_at = ?, sent_count = ? WHERE id = ?")
            .bind(sent_at)
            .bind(sent_count)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to mark newsletter issue sent")?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM newsletter_issues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete newsletter issue")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM newsletter_issues")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count newsletter issues")?;

        Ok(row.get("count"))
    }
}

fn parse_status(row: &sqlx::sqlite::SqliteRow) -> Result<IssueStatus> {
    let status_str: String = row.get("status");
    IssueStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid issue status: {}", status_str))
}

fn row_to_issue(row: &sqlx::sqlite::SqliteRow) -> Result<NewsletterIssue> {
    Ok(NewsletterIssue {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        file_url: row.get("file_url"),
        file_name: row.get("file_name"),
        file_size: row.get("file_size"),
        issue_date: row.get("issue_date"),
        status: parse_status(row)?,
        sent_at: row.get("sent_at"),
        sent_count: row.get("sent_count"),
        created_at: row.get("created_at"),
    })
}

fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> Result<IssueSummary> {
    Ok(IssueSummary {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        file_name: row.get("file_name"),
        file_size: row.get("file_size"),
        issue_date: row.get("issue_date"),
        status: parse_status(row)?,
        sent_at: row.get("sent_at"),
        sent_count: row.get("sent_count"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxIssueRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxIssueRepository::new(pool)
    }

    fn input(title: &str, status: IssueStatus) -> CreateIssueInput {
        CreateIssueInput {
            title: title.to_string(),
            description: None,
            file_url: "data:application/pdf;base64,AAAA".to_string(),
            file_name: format!("{}.pdf", title.to_lowercase()),
            file_size: 4,
            issue_date: None,
            status,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;
        let created = repo
            .create(&input("April", IssueStatus::Published))
            .await
            .expect("create");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("get")
            .expect("some");
        assert_eq!(found.title, "April");
        assert!(found.file_url.starts_with("data:application/pdf"));
        assert!(found.sent_at.is_none());
    }

    #[tokio::test]
    async fn test_list_published_only() {
        let repo = setup().await;
        repo.create(&input("Public", IssueStatus::Published))
            .await
            .expect("create");
        repo.create(&input("Hidden", IssueStatus::Draft))
            .await
            .expect("create");

        let public = repo.list(true).await.expect("list");
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].title, "Public");

        let all = repo.list(false).await.expect("list");
        assert_eq!(all.len(), 2);
        assert_eq!(repo.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_mark_sent() {
        let repo = setup().await;
        let issue = repo
            .create(&input("May", IssueStatus::Published))
            .await
            .expect("create");

        let sent_at = Utc::now();
        repo.mark_sent(issue.id, sent_at, 42).await.expect("mark");

        let found = repo
            .get_by_id(issue.id)
            .await
            .expect("get")
            .expect("some");
        assert_eq!(found.sent_count, Some(42));
        assert!(found.sent_at.is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let issue = repo
            .create(&input("June", IssueStatus::Published))
            .await
            .expect("create");

        assert!(repo.delete(issue.id).await.expect("delete"));
        assert!(!repo.delete(issue.id).await.expect("second delete"));
    }
}
