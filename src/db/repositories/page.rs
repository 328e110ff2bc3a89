//! Static page repository

use crate::models::{ContentBlock, PageName, StaticPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Static page repository trait
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Get a page by name, None when it was never saved
    async fn get(&self, page: PageName) -> Result<Option<StaticPage>>;

    /// List all saved pages
    async fn list(&self) -> Result<Vec<StaticPage>>;

    /// Insert or replace a page's content, preserving created_at on update
    async fn upsert(
        &self,
        page: PageName,
        content: &serde_json::Value,
        blocks: &[ContentBlock],
    ) -> Result<StaticPage>;
}

/// SQLx-based static page repository implementation
pub struct SqlxPageRepository {
    pool: SqlitePool,
}

impl SqlxPageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn PageRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PageRepository for SqlxPageRepository {
    async fn get(&self, page: PageName) -> Result<Option<StaticPage>> {
        let row = sqlx::query("SELECT * FROM static_pages WHERE page = ?")
            .bind(page.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get static page")?;

        row.map(|row| row_to_page(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<StaticPage>> {
        let rows = sqlx::query("SELECT * FROM static_pages ORDER BY page")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list static pages")?;

        rows.iter().map(row_to_page).collect()
    }

    async fn upsert(
        &self,
        page: PageName,
        content: &serde_json::Value,
        blocks: &[ContentBlock],
    ) -> Result<StaticPage> {
        let now = Utc::now();
        let content_json = serde_json::to_string(content).context("Failed to encode page content")?;
        let blocks_json = serde_json::to_string(blocks).context("Failed to encode page blocks")?;

        sqlx::query(
            r#"
            INSERT INTO static_pages (page, content, blocks, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(page) DO UPDATE SET
                content = excluded.content,
                blocks = excluded.blocks,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(page.as_str())
        .bind(&content_json)
        .bind(&blocks_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to upsert static page")?;

        self.get(page)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Upserted page {} not found", page))
    }
}

fn row_to_page(row: &sqlx::sqlite::SqliteRow) -> Result<StaticPage> {
    let name: String = row.get("page");
    let page = PageName::from_str(&name)
        .ok_or_else(|| anyhow::anyhow!("Invalid page name: {}", name))?;
    let content_raw: String = row.get("content");
    let blocks_raw: String = row.get("blocks");

    Ok(StaticPage {
        page,
        content: serde_json::from_str(&content_raw).context("Failed to decode page content")?,
        blocks: serde_json::from_str(&blocks_raw).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
