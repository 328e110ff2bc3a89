//! API middleware
//!
//! Shared application state, the API error type, and the authentication
//! middleware that guards the admin surface.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::models::AdminClaims;
use crate::services::{
    ArticleError, ArticleService, AuthError, AuthService, BookingError, BookingService,
    ContactError, ContactService, NewsletterError, NewsletterService, PageError, PageService,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<ArticleService>,
    pub page_service: Arc<PageService>,
    pub newsletter_service: Arc<NewsletterService>,
    pub booking_service: Arc<BookingService>,
    pub contact_service: Arc<ContactService>,
    pub auth_service: Arc<AuthService>,
}

/// Admin identity extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub AdminClaims);

/// Error response for API errors. Serializes as `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ArticleError> for ApiError {
    fn from(error: ArticleError) -> Self {
        match &error {
            ArticleError::NotFound => Self::not_found(error.to_string()),
            ArticleError::DuplicateSlug | ArticleError::Validation(_) => {
                Self::bad_request(error.to_string())
            }
            ArticleError::InternalError(inner) => internal(inner),
        }
    }
}

impl From<PageError> for ApiError {
    fn from(error: PageError) -> Self {
        match &error {
            PageError::UnknownPage(_) | PageError::BlockNotFound => {
                Self::not_found(error.to_string())
            }
            PageError::InternalError(inner) => internal(inner),
        }
    }
}

impl From<NewsletterError> for ApiError {
    fn from(error: NewsletterError) -> Self {
        match &error {
            NewsletterError::IssueNotFound | NewsletterError::SubscriberNotFound => {
                Self::not_found(error.to_string())
            }
            NewsletterError::AlreadySubscribed
            | NewsletterError::InvalidEmail
            | NewsletterError::NoActiveSubscribers
            | NewsletterError::Validation(_) => Self::bad_request(error.to_string()),
            NewsletterError::InternalError(inner) => internal(inner),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(error: BookingError) -> Self {
        match &error {
            BookingError::NotFound => Self::not_found(error.to_string()),
            BookingError::Validation(_) => Self::bad_request(error.to_string()),
            BookingError::InternalError(inner) => internal(inner),
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(error: ContactError) -> Self {
        match &error {
            ContactError::NotFound => Self::not_found(error.to_string()),
            ContactError::Validation(_) => Self::bad_request(error.to_string()),
            ContactError::InternalError(inner) => internal(inner),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match &error {
            AuthError::InvalidCredentials => Self::unauthorized(error.to_string()),
            AuthError::InvalidToken => Self::unauthorized(error.to_string()),
            AuthError::InternalError(inner) => internal(inner),
        }
    }
}

fn internal(error: &anyhow::Error) -> ApiError {
    tracing::error!(%error, "Internal server error");
    ApiError::internal("Internal server error")
}

/// Extract a bearer token from the Authorization header.
fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Admin authentication middleware.
///
/// 401 when the token is missing, malformed, or expired; 403 when the
/// claims lack the admin role.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let claims = state.auth_service.verify_token(token)?;

    if !claims.is_admin() {
        return Err(ApiError::forbidden("Admin privileges required"));
    }

    request.extensions_mut().insert(AuthenticatedAdmin(claims));
    Ok(next.run(request).await)
}

/// Optional admin middleware.
///
/// Decorates the request with [`AuthenticatedAdmin`] when a valid admin
/// token is present, and does nothing otherwise. Used on public listings
/// that show extra rows (drafts) to an authenticated admin.
pub async fn optional_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer_token(&request) {
        if let Ok(claims) = state.auth_service.verify_token(token) {
            if claims.is_admin() {
                request.extensions_mut().insert(AuthenticatedAdmin(claims));
            }
        }
    }
    next.run(request).await
}
