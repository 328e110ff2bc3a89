//! Article service
//!
//! Publishing workflow on top of the article repository: slug derivation
//! and uniqueness, draft/published transitions, and the publish date that
//! is set once on first publish and never overwritten.

use crate::db::repositories::ArticleRepository;
use crate::models::{
    Article, ArticleFilter, ArticleStatus, ArticleSummary, CreateArticleInput, PagedResult,
    UpdateArticleInput,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Derive a URL slug from a title: lowercase, runs of anything outside
/// `[a-z0-9]` collapse to a single hyphen, edge hyphens are stripped.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let replaced = NON_SLUG_CHARS.replace_all(&lowered, "-");
    replaced.trim_matches('-').to_string()
}

/// Article service errors
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("Article not found")]
    NotFound,

    #[error("An article with this slug already exists")]
    DuplicateSlug,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Article service
pub struct ArticleService {
    repository: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    /// Create an article, deriving the slug from the title when none is
    /// supplied.
    pub async fn create(&self, input: CreateArticleInput) -> Result<Article, ArticleError> {
        if input.title.trim().is_empty() {
            return Err(ArticleError::Validation("Title is required".to_string()));
        }
        if input.content.trim().is_empty() {
            return Err(ArticleError::Validation("Content is required".to_string()));
        }

        let slug = match &input.slug {
            Some(slug) if !slug.trim().is_empty() => slugify(slug),
            _ => slugify(&input.title),
        };
        if slug.is_empty() {
            return Err(ArticleError::Validation(
                "Title does not produce a valid slug".to_string(),
            ));
        }

        if self.repository.exists_by_slug(&slug, None).await? {
            return Err(ArticleError::DuplicateSlug);
        }

        let status = input.status.unwrap_or_default();
        let publish_date = match status {
            ArticleStatus::Published => Some(input.publish_date.unwrap_or_else(Utc::now)),
            ArticleStatus::Draft => input.publish_date,
        };

        let article = self.repository.create(&input, &slug, publish_date).await?;
        tracing::info!(id = article.id, slug = %article.slug, "Article created");
        Ok(article)
    }

    /// Public read path: published articles only.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Article, ArticleError> {
        self.repository
            .get_by_slug(slug, true)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// Admin read path: any status, by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Article, ArticleError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound)
    }

    /// List summaries with total count for pagination.
    pub async fn list(
        &self,
        filter: ArticleFilter,
    ) -> Result<PagedResult<ArticleSummary>, ArticleError> {
        let filter = filter.normalized();
        let items = self.repository.list(&filter).await?;
        let total = self.repository.count(&filter).await?;
        Ok(PagedResult {
            items,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    /// Apply a partial update. A slug change is validated for uniqueness
    /// against every other article; the first draft-to-published transition
    /// stamps the publish date.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateArticleInput,
    ) -> Result<Article, ArticleError> {
        let mut article = self.get_by_id(id).await?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(ArticleError::Validation("Title is required".to_string()));
            }
            article.title = title;
        }
        if let Some(slug) = input.slug {
            let slug = slugify(&slug);
            if slug.is_empty() {
                return Err(ArticleError::Validation("Invalid slug".to_string()));
            }
            if slug != article.slug && self.repository.exists_by_slug(&slug, Some(id)).await? {
                return Err(ArticleError::DuplicateSlug);
            }
            article.slug = slug;
        }
        if let Some(subtitle) = input.subtitle {
            article.subtitle = Some(subtitle);
        }
        if let Some(category) = input.category {
            article.category = category;
        }
        if let Some(tags) = input.tags {
            article.tags = tags;
        }
        if let Some(thumbnail) = input.thumbnail {
            article.thumbnail = Some(thumbnail);
        }
        if let Some(thumbnail_alt) = input.thumbnail_alt {
            article.thumbnail_alt = Some(thumbnail_alt);
        }
        if let Some(content) = input.content {
            if content.trim().is_empty() {
                return Err(ArticleError::Validation("Content is required".to_string()));
            }
            article.content = content;
        }
        if let Some(featured) = input.featured {
            article.featured = featured;
        }
        if let Some(publish_date) = input.publish_date {
            article.publish_date = Some(publish_date);
        }
        if let Some(status) = input.status {
            if status == ArticleStatus::Published && article.publish_date.is_none() {
                article.publish_date = Some(Utc::now());
            }
            article.status = status;
        }

        article.updated_at = Utc::now();
        self.repository.update(&article).await?;
        Ok(article)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ArticleError> {
        if !self.repository.delete(id).await? {
            return Err(ArticleError::NotFound);
        }
        tracing::info!(id, "Article deleted");
        Ok(())
    }

    /// Counts for the admin stats endpoint: (total, published, featured)
    pub async fn stats(&self) -> Result<(i64, i64, i64), ArticleError> {
        Ok(self.repository.stats().await?)
    }
}
