//! Article API endpoints
//!
//! The public listing defaults to published articles; an authenticated
//! admin on the same endpoint may filter by any status. Id-based
//! operations are admin only, the slug lookup is public.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedAdmin};
use crate::models::{
    Article, ArticleFilter, ArticleStatus, ArticleSummary, Category, CreateArticleInput,
    PagedResult, UpdateArticleInput,
};

/// Query parameters for listing articles
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    /// Honored for admins only; public listings are always published
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListArticlesQuery {
    fn into_filter(self, public: bool) -> Result<ArticleFilter, ApiError> {
        let category = match self.category.as_deref() {
            Some(raw) => Some(
                Category::from_str(raw)
                    .ok_or_else(|| ApiError::bad_request(format!("Unknown category: {}", raw)))?,
            ),
            None => None,
        };
        let status = if public {
            Some(ArticleStatus::Published)
        } else {
            match self.status.as_deref() {
                Some(raw) => Some(
                    ArticleStatus::from_str(raw)
                        .ok_or_else(|| ApiError::bad_request(format!("Unknown status: {}", raw)))?,
                ),
                None => None,
            }
        };

        Ok(ArticleFilter {
            category,
            status,
            tag: self.tag,
            search: self.search,
            featured: self.featured,
            limit: self.limit.unwrap_or(ArticleFilter::DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// GET /api/articles
pub async fn list(
    State(state): State<AppState>,
    admin: Option<Extension<AuthenticatedAdmin>>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<PagedResult<ArticleSummary>>, ApiError> {
    let filter = query.into_filter(admin.is_none())?;
    Ok(Json(state.article_service.list(filter).await?))
}

/// GET /api/articles/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.article_service.get_published_by_slug(&slug).await?))
}

/// GET /api/articles/meta/categories
pub async fn categories() -> Json<Vec<&'static str>> {
    Json(Category::ALL.iter().map(Category::as_str).collect())
}

/// GET /api/articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.article_service.get_by_id(id).await?))
}

/// POST /api/articles
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateArticleInput>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = state.article_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/articles/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateArticleInput>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.article_service.update(id, input).await?))
}

/// DELETE /api/articles/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.article_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
