//! Admin dashboard endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};

/// Dashboard counters
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub articles: ArticleStats,
    pub subscribers: SubscriberStats,
    pub newsletter_issues: i64,
    pub bookings: BookingStats,
}

#[derive(Debug, Serialize)]
pub struct ArticleStats {
    pub total: i64,
    pub published: i64,
    pub featured: i64,
}

#[derive(Debug, Serialize)]
pub struct SubscriberStats {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Serialize)]
pub struct BookingStats {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let (articles_total, published, featured) = state.article_service.stats().await?;
    let (subscribers_total, active) = state.newsletter_service.subscriber_stats().await?;
    let issues = state.newsletter_service.issue_count().await?;
    let (bookings_total, pending, completed) = state.booking_service.stats().await?;

    Ok(Json(StatsResponse {
        articles: ArticleStats {
            total: articles_total,
            published,
            featured,
        },
        subscribers: SubscriberStats {
            total: subscribers_total,
            active,
        },
        newsletter_issues: issues,
        bookings: BookingStats {
            total: bookings_total,
            pending,
            completed,
        },
    }))
}
