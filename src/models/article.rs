//! Article model
//!
//! This module provides:
//! - `Article` entity representing a published or draft article
//! - `ArticleStatus` and the closed `Category` set
//! - Input types for creating and updating articles
//! - Filter and pagination types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// Optional subtitle
    pub subtitle: Option<String>,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Category (closed set)
    pub category: Category,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Thumbnail alt text
    pub thumbnail_alt: Option<String>,
    /// Body content
    pub content: String,
    /// Whether the article is featured on the front page
    #[serde(default)]
    pub featured: bool,
    /// Publication status
    pub status: ArticleStatus,
    /// Set once on the first transition to published, never overwritten
    pub publish_date: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Article listing row: everything except the (large) body content.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
    pub featured: bool,
    pub status: ArticleStatus,
    pub publish_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            subtitle: article.subtitle,
            slug: article.slug,
            category: article.category,
            tags: article.tags,
            thumbnail: article.thumbnail,
            featured: article.featured,
            status: article.status,
            publish_date: article.publish_date,
            created_at: article.created_at,
        }
    }
}

/// Article publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Draft - not visible to public
    Draft,
    /// Published - visible to public
    Published,
}

impl Default for ArticleStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl ArticleStatus {
    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    /// Parse from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fixed article category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Namibia,
    #[serde(rename = "South Africa")]
    SouthAfrica,
    #[serde(rename = "Global Markets")]
    GlobalMarkets,
    Crypto,
    #[serde(rename = "Investing Guides")]
    InvestingGuides,
    #[serde(rename = "Housing & Personal Finance")]
    HousingPersonalFinance,
    #[serde(rename = "Business & Entrepreneurship")]
    BusinessEntrepreneurship,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Namibia,
        Category::SouthAfrica,
        Category::GlobalMarkets,
        Category::Crypto,
        Category::InvestingGuides,
        Category::HousingPersonalFinance,
        Category::BusinessEntrepreneurship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Namibia => "Namibia",
            Category::SouthAfrica => "South Africa",
            Category::GlobalMarkets => "Global Markets",
            Category::Crypto => "Crypto",
            Category::InvestingGuides => "Investing Guides",
            Category::HousingPersonalFinance => "Housing & Personal Finance",
            Category::BusinessEntrepreneurship => "Business & Entrepreneurship",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new article
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleInput {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Derived from the title when absent
    #[serde(default)]
    pub slug: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail_alt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
}

/// Input for updating an existing article; unset fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticleInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub slug: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub thumbnail_alt: Option<String>,
    pub content: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ArticleStatus>,
    pub publish_date: Option<DateTime<Utc>>,
}

/// Filters for article list queries.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<Category>,
    pub status: Option<ArticleStatus>,
    /// Matches articles carrying the tag
    pub tag: Option<String>,
    /// Case-insensitive substring over title or subtitle
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl ArticleFilter {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    /// Public listing defaults: published only, first page.
    pub fn published() -> Self {
        Self {
            status: Some(ArticleStatus::Published),
            limit: Self::DEFAULT_LIMIT,
            ..Self::default()
        }
    }

    /// Clamp limit/offset into their allowed ranges.
    pub fn normalized(mut self) -> Self {
        if self.limit <= 0 {
            self.limit = Self::DEFAULT_LIMIT;
        }
        self.limit = self.limit.min(Self::MAX_LIMIT);
        self.offset = self.offset.max(0);
        self
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_str("Bonds"), None);
    }

    #[test]
    fn test_category_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::HousingPersonalFinance).unwrap();
        assert_eq!(json, "\"Housing & Personal Finance\"");
        let parsed: Category = serde_json::from_str("\"South Africa\"").unwrap();
        assert_eq!(parsed, Category::SouthAfrica);
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(ArticleStatus::from_str("published"), Some(ArticleStatus::Published));
        assert_eq!(ArticleStatus::from_str("DRAFT"), Some(ArticleStatus::Draft));
        assert_eq!(ArticleStatus::from_str("archived"), None);
    }

    #[test]
    fn test_filter_normalization() {
        let filter = ArticleFilter {
            limit: 0,
            offset: -5,
            ..ArticleFilter::default()
        }
        .normalized();
        assert_eq!(filter.limit, ArticleFilter::DEFAULT_LIMIT);
        assert_eq!(filter.offset, 0);

        let filter = ArticleFilter {
            limit: 500,
            ..ArticleFilter::default()
        }
        .normalized();
        assert_eq!(filter.limit, ArticleFilter::MAX_LIMIT);
    }
}
