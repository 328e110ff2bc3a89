//! Article repository
//!
//! Database operations for articles, including the filtered list query
//! behind the public article index.

use crate::models::{
    Article, ArticleFilter, ArticleStatus, ArticleSummary, Category, CreateArticleInput,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article. The caller has already resolved the slug and
    /// publish date.
    async fn create(&self, input: &CreateArticleInput, slug: &str, publish_date: Option<DateTime<Utc>>) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get article by slug, optionally restricted to published
    async fn get_by_slug(&self, slug: &str, published_only: bool) -> Result<Option<Article>>;

    /// List article summaries matching the filter
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<ArticleSummary>>;

    /// Count articles matching the filter (ignoring limit/offset)
    async fn count(&self, filter: &ArticleFilter) -> Result<i64>;

    /// Persist a fully-resolved article record
    async fn update(&self, article: &Article) -> Result<()>;

    /// Delete an article; returns false when the id was absent
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Check if a slug already exists, optionally excluding one article
    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;

    /// Counts for the admin stats endpoint: (total, published, featured)
    async fn stats(&self) -> Result<(i64, i64, i64)>;
}

/// SQLx-based article repository implementation
pub struct SqlxArticleRepository {
    pool: SqlitePool,
}

impl SqlxArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

const SUMMARY_COLUMNS: &str =
    "id, title, subtitle, slug, category, tags, thumbnail, featured, status, publish_date, created_at";

fn push_filter_clauses<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a ArticleFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(tag) = &filter.tag {
        // Tags are stored as a JSON array of strings.
        qb.push(" AND tags LIKE ").push_bind(format!("%\"{}\"%", tag));
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.to_lowercase());
        qb.push(" AND (LOWER(title) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(COALESCE(subtitle, '')) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(
        &self,
        input: &CreateArticleInput,
        slug: &str,
        publish_date: Option<DateTime<Utc>>,
    ) -> Result<Article> {
        let now = Utc::now();
        let status = input.status.unwrap_or_default();
        let tags_json = serde_json::to_string(&input.tags).context("Failed to encode tags")?;

        let result = sqlx::query(
            r#"
            INSERT INTO articles (title, subtitle, slug, category, tags, thumbnail, thumbnail_alt, content, featured, status, publish_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(slug)
        .bind(input.category.as_str())
        .bind(&tags_json)
        .bind(&input.thumbnail)
        .bind(&input.thumbnail_alt)
        .bind(&input.content)
        .bind(input.featured)
        .bind(status.as_str())
        .bind(publish_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create article")?;

        Ok(Article {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            subtitle: input.subtitle.clone(),
            slug: slug.to_string(),
            category: input.category,
            tags: input.tags.clone(),
            thumbnail: input.thumbnail.clone(),
            thumbnail_alt: input.thumbnail_alt.clone(),
            content: input.content.clone(),
            featured: input.featured,
            status,
            publish_date,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get article by ID")?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn get_by_slug(&self, slug: &str, published_only: bool) -> Result<Option<Article>> {
        let query = if published_only {
            "SELECT * FROM articles WHERE slug = ? AND status = 'published'"
        } else {
            "SELECT * FROM articles WHERE slug = ?"
        };

        let row = sqlx::query(query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get article by slug")?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<ArticleSummary>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM articles WHERE 1=1",
            SUMMARY_COLUMNS
        ));
        push_filter_clauses(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list articles")?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn count(&self, filter: &ArticleFilter) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) AS count FROM articles WHERE 1=1");
        push_filter_clauses(&mut qb, filter);

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .context("Failed to count articles")?;

        Ok(row.get("count"))
    }

    async fn update(&self, article: &Article) -> Result<()> {
        let tags_json = serde_json::to_string(&article.tags).context("Failed to encode tags")?;

        sqlx::query(
            r#"
            UPDATE articles
            SET title = ?, subtitle = ?, slug = ?, category = ?, tags = ?, thumbnail = ?, thumbnail_alt = ?, content = ?, featured = ?, status = ?, publish_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&article.title)
        .bind(&article.subtitle)
        .bind(&article.slug)
        .bind(article.category.as_str())
        .bind(&tags_json)
        .bind(&article.thumbnail)
        .bind(&article.thumbnail_alt)
        .bind(&article.content)
        .bind(article.featured)
        .bind(article.status.as_str())
        .bind(article.publish_date)
        .bind(article.updated_at)
        .bind(article.id)
        .execute(&self.pool)
        .await
        .context("Failed to update article")?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete article")?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let row = match exclude_id {
            Some(id) => {
                sqlx::query("SELECT COUNT(*) AS count FROM articles WHERE slug = ? AND id != ?")
                    .bind(slug)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM articles WHERE slug = ?")
                    .bind(slug)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .context("Failed to check article slug existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn stats(&self) -> Result<(i64, i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN status = 'published' THEN 1 ELSE 0 END) AS published,
                SUM(CASE WHEN featured THEN 1 ELSE 0 END) AS featured
            FROM articles
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to load article stats")?;

        Ok((
            row.get("total"),
            row.try_get("published").unwrap_or(0),
            row.try_get("featured").unwrap_or(0),
        ))
    }
}

fn parse_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn row_to_article(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    let status_str: String = row.get("status");
    let status = ArticleStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid article status: {}", status_str))?;
    let category_str: String = row.get("category");
    let category = Category::from_str(&category_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid article category: {}", category_str))?;
    let tags_raw: String = row.get("tags");

    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        slug: row.get("slug"),
        category,
        tags: parse_tags(&tags_raw),
        thumbnail: row.get("thumbnail"),
        thumbnail_alt: row.get("thumbnail_alt"),
        content: row.get("content"),
        featured: row.get("featured"),
        status,
        publish_date: row.get("publish_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> Result<ArticleSummary> {
    let status_str: String = row.get("status");
    let status = ArticleStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid article status: {}", status_str))?;
    let category_str: String = row.get("category");
    let category = Category::from_str(&category_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid article category: {}", category_str))?;
    let tags_raw: String = row.get("tags");

    Ok(ArticleSummary {
        id: row.get("id"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        slug: row.get("slug"),
        category,
        tags: parse_tags(&tags_raw),
        thumbnail: row.get("thumbnail"),
        featured: row.get("featured"),
        status,
        publish_date: row.get("publish_date"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxArticleRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxArticleRepository::new(pool)
    }

    fn input(title: &str, status: ArticleStatus) -> CreateArticleInput {
        CreateArticleInput {
            title: title.to_string(),
            subtitle: Some(format!("{} subtitle", title)),
            slug: None,
            category: Category::Crypto,
            tags: vec!["bitcoin".to_string()],
            thumbnail: None,
            thumbnail_alt: None,
            content: format!("Body of {}", title),
            featured: false,
            status: Some(status),
            publish_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;
        let created = repo
            .create(&input("First Post", ArticleStatus::Draft), "first-post", None)
            .await
            .expect("create");

        assert!(created.id > 0);

        let found = repo.get_by_id(created.id).await.expect("get").expect("some");
        assert_eq!(found.slug, "first-post");
        assert_eq!(found.category, Category::Crypto);
        assert_eq!(found.tags, vec!["bitcoin".to_string()]);
        assert!(found.publish_date.is_none());
    }

    #[tokio::test]
    async fn test_slug_lookup_respects_published_flag() {
        let repo = setup().await;
        repo.create(&input("Hidden Draft", ArticleStatus::Draft), "hidden-draft", None)
            .await
            .expect("create");

        let public = repo.get_by_slug("hidden-draft", true).await.expect("get");
        assert!(public.is_none());

        let admin = repo.get_by_slug("hidden-draft", false).await.expect("get");
        assert!(admin.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected_by_schema() {
        let repo = setup().await;
        repo.create(&input("Same Title", ArticleStatus::Draft), "same-title", None)
            .await
            .expect("first create");

        let second = repo
            .create(&input("Same Title", ArticleStatus::Draft), "same-title", None)
            .await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let repo = setup().await;
        let now = Some(Utc::now());
        repo.create(&input("Crypto Basics", ArticleStatus::Published), "crypto-basics", now)
            .await
            .expect("create");
        let mut namibia = input("Windhoek Markets", ArticleStatus::Published);
        namibia.category = Category::Namibia;
        namibia.featured = true;
        repo.create(&namibia, "windhoek-markets", now).await.expect("create");
        repo.create(&input("Draft Piece", ArticleStatus::Draft), "draft-piece", None)
            .await
            .expect("create");

        let published = ArticleFilter::published().normalized();
        assert_eq!(repo.count(&published).await.expect("count"), 2);

        let by_category = ArticleFilter {
            category: Some(Category::Namibia),
            ..ArticleFilter::published()
        }
        .normalized();
        let rows = repo.list(&by_category).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].slug, "windhoek-markets");

        let featured = ArticleFilter {
            featured: Some(true),
            ..ArticleFilter::published()
        }
        .normalized();
        assert_eq!(repo.count(&featured).await.expect("count"), 1);

        let by_tag = ArticleFilter {
            tag: Some("bitcoin".to_string()),
            ..ArticleFilter::published()
        }
        .normalized();
        assert_eq!(repo.count(&by_tag).await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_subtitle() {
        let repo = setup().await;
        let now = Some(Utc::now());
        repo.create(&input("Rand Outlook", ArticleStatus::Published), "rand-outlook", now)
            .await
            .expect("create");

        let by_title = ArticleFilter {
            search: Some("rand".to_string()),
            ..ArticleFilter::published()
        }
        .normalized();
        assert_eq!(repo.count(&by_title).await.expect("count"), 1);

        // Subtitle is "Rand Outlook subtitle".
        let by_subtitle = ArticleFilter {
            search: Some("SUBTITLE".to_string()),
            ..ArticleFilter::published()
        }
        .normalized();
        assert_eq!(repo.count(&by_subtitle).await.expect("count"), 1);

        let miss = ArticleFilter {
            search: Some("dollar".to_string()),
            ..ArticleFilter::published()
        }
        .normalized();
        assert_eq!(repo.count(&miss).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_list_excludes_body() {
        let repo = setup().await;
        repo.create(
            &input("Listed", ArticleStatus::Published),
            "listed",
            Some(Utc::now()),
        )
        .await
        .expect("create");

        let rows = repo
            .list(&ArticleFilter::published().normalized())
            .await
            .expect("list");
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["slug"], "listed");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let created = repo
            .create(&input("Doomed", ArticleStatus::Draft), "doomed", None)
            .await
            .expect("create");

        assert!(repo.delete(created.id).await.expect("delete"));
        assert!(!repo.delete(created.id).await.expect("second delete"));
        assert!(repo.get_by_id(created.id).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_exists_by_slug_excluding() {
        let repo = setup().await;
        let first = repo
            .create(&input("One", ArticleStatus::Draft), "one", None)
            .await
            .expect("create");
        repo.create(&input("Two", ArticleStatus::Draft), "two", None)
            .await
            .expect("create");

        assert!(repo.exists_by_slug("one", None).await.expect("check"));
        assert!(!repo.exists_by_slug("one", Some(first.id)).await.expect("check"));
        assert!(repo.exists_by_slug("two", Some(first.id)).await.expect("check"));
    }

    #[tokio::test]
    async fn test_stats() {
        let repo = setup().await;
        let now = Some(Utc::now());
        let mut featured = input("Star", ArticleStatus::Published);
        featured.featured = true;
        repo.create(&featured, "star", now).await.expect("create");
        repo.create(&input("Plain", ArticleStatus::Draft), "plain", None)
            .await
            .expect("create");

        let (total, published, starred) = repo.stats().await.expect("stats");
        assert_eq!((total, published, starred), (2, 1, 1));
    }
}
