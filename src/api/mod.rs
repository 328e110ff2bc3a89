//! API layer - HTTP handlers and routing
//!
//! Everything is served under `/api`. Admin operations share resource
//! paths with the public surface and sit behind the bearer-token
//! middleware; the public surface is read-only apart from the subscribe,
//! booking, and contact forms.

pub mod admin;
pub mod articles;
pub mod auth;
pub mod bookings;
pub mod contact;
pub mod middleware;
pub mod newsletter;
pub mod pages;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::repositories::{
    SqlxAdminUserRepository, SqlxArticleRepository, SqlxBookingRepository, SqlxContactRepository,
    SqlxIssueRepository, SqlxPageRepository, SqlxSubscriberRepository,
};
use crate::services::{
    build_mailer, ArticleService, AuthService, BookingService, ContactService, NewsletterService,
    PageService,
};

pub use middleware::{ApiError, AppState};

/// Wire repositories, services, and the mailer into the shared state.
pub fn build_state(pool: SqlitePool, config: &Config) -> Result<AppState> {
    let mailer = build_mailer(&config.email)?;

    Ok(AppState {
        article_service: Arc::new(ArticleService::new(SqlxArticleRepository::boxed(
            pool.clone(),
        ))),
        page_service: Arc::new(PageService::new(SqlxPageRepository::boxed(pool.clone()))),
        newsletter_service: Arc::new(NewsletterService::new(
            SqlxSubscriberRepository::boxed(pool.clone()),
            SqlxIssueRepository::boxed(pool.clone()),
            mailer.clone(),
            config.email.site_url.clone(),
        )),
        booking_service: Arc::new(BookingService::new(
            SqlxBookingRepository::boxed(pool.clone()),
            mailer.clone(),
            config.email.admin_address.clone(),
        )),
        contact_service: Arc::new(ContactService::new(
            SqlxContactRepository::boxed(pool.clone()),
            mailer,
            config.email.admin_address.clone(),
        )),
        auth_service: Arc::new(AuthService::new(
            SqlxAdminUserRepository::boxed(pool),
            config.auth.clone(),
        )),
    })
}

/// Build the API router mounted under `/api`.
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin operations, guarded by the bearer-token middleware.
    let admin_routes = Router::new()
        .route("/articles", post(articles::create))
        .route(
            "/articles/{id}",
            get(articles::get_by_id)
                .put(articles::update)
                .delete(articles::remove),
        )
        .route("/pages/{name}", put(pages::save_page))
        .route("/pages/{name}/blocks", post(pages::add_block))
        .route(
            "/pages/{name}/blocks/{block_id}",
            put(pages::update_block).delete(pages::remove_block),
        )
        .route(
            "/newsletter/upload",
            // Headroom over the file cap for the multipart framing and
            // metadata fields; the handler enforces the cap itself.
            post(newsletter::upload_issue)
                .layer(DefaultBodyLimit::max(newsletter::MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/newsletter/subscribers", get(newsletter::list_subscribers))
        .route(
            "/newsletter/subscribers/{id}",
            delete(newsletter::remove_subscriber),
        )
        .route("/newsletter/{id}", delete(newsletter::remove_issue))
        .route("/newsletter/{id}/send", post(newsletter::send_issue))
        .route("/sessions", get(bookings::list))
        .route(
            "/sessions/{id}",
            get(bookings::get_by_id)
                .patch(bookings::update_status)
                .delete(bookings::remove),
        )
        .route("/contact", get(contact::list))
        .route(
            "/contact/{id}",
            axum::routing::patch(contact::update_status).delete(contact::remove),
        )
        .route("/admin/stats", get(admin::stats))
        .route("/auth/me", get(auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    // Public listings that show extra rows to an authenticated admin.
    let listing_routes = Router::new()
        .route("/articles", get(articles::list))
        .route("/newsletter/list", get(newsletter::list_issues))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::optional_admin,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth", post(auth::login))
        .route("/articles/slug/{slug}", get(articles::get_by_slug))
        .route("/articles/meta/categories", get(articles::categories))
        .route("/pages", get(pages::list))
        .route("/pages/{name}", get(pages::get_page))
        .route("/newsletter/subscribe", post(newsletter::subscribe))
        .route("/newsletter/{id}", get(newsletter::get_issue))
        .route("/sessions", post(bookings::create))
        .route("/contact", post(contact::submit))
        .merge(listing_routes)
        .merge(admin_routes)
}

/// Build the complete router with middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
