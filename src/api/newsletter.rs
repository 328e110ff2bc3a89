//! Newsletter API endpoints
//!
//! Public subscribe and issue listing plus the admin upload/send surface.
//! Uploaded PDFs are stored inline as base64 `data:` URLs, so an issue's
//! download needs no separate file storage.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use data_encoding::BASE64;
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::{ApiError, AppState, AuthenticatedAdmin};
use crate::models::{CreateIssueInput, IssueStatus, IssueSummary, NewsletterIssue, Subscriber};

/// Upload cap for issue PDFs.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Request body for subscribing
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /api/newsletter/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let subscriber = state
        .newsletter_service
        .subscribe(&body.email, body.name.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Successfully subscribed to newsletter",
            "subscriber": subscriber,
        })),
    ))
}

/// GET /api/newsletter/list
///
/// Published issues for everyone; an authenticated admin also sees drafts.
pub async fn list_issues(
    State(state): State<AppState>,
    admin: Option<Extension<AuthenticatedAdmin>>,
) -> Result<Json<Vec<IssueSummary>>, ApiError> {
    Ok(Json(
        state.newsletter_service.list_issues(admin.is_none()).await?,
    ))
}

/// GET /api/newsletter/{id}
pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<NewsletterIssue>, ApiError> {
    Ok(Json(state.newsletter_service.get_issue(id).await?))
}

/// GET /api/newsletter/subscribers
pub async fn list_subscribers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
    Ok(Json(state.newsletter_service.list_subscribers().await?))
}

/// DELETE /api/newsletter/subscribers/{id}
pub async fn remove_subscriber(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.newsletter_service.remove_subscriber(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/newsletter/upload
///
/// Multipart form: a `file` part (the PDF) plus `title`, and optionally
/// `description`, `issue_date` (RFC 3339) and `status`.
pub async fn upload_issue(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<NewsletterIssue>), ApiError> {
    let mut title = None;
    let mut description = None;
    let mut issue_date = None;
    let mut status = IssueStatus::default();
    let mut file: Option<(String, Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            "issue_date" => {
                let raw = read_text(field).await?;
                let parsed: DateTime<Utc> = raw
                    .parse()
                    .map_err(|_| ApiError::bad_request(format!("Invalid issue date: {}", raw)))?;
                issue_date = Some(parsed);
            }
            "status" => {
                let raw = read_text(field).await?;
                status = IssueStatus::from_str(&raw)
                    .ok_or_else(|| ApiError::bad_request(format!("Unknown status: {}", raw)))?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("issue.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, bytes.to_vec(), content_type));
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| ApiError::bad_request("Title is required"))?;
    let (file_name, bytes, content_type) =
        file.ok_or_else(|| ApiError::bad_request("A file is required"))?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::bad_request(format!(
            "File too large. Maximum size: {} MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let file_url = format!("data:{};base64,{}", content_type, BASE64.encode(&bytes));
    let issue = state
        .newsletter_service
        .create_issue(CreateIssueInput {
            title,
            description,
            file_url,
            file_name,
            file_size: bytes.len() as i64,
            issue_date,
            status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(issue)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart field: {}", e)))
}

/// DELETE /api/newsletter/{id}
pub async fn remove_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.newsletter_service.delete_issue(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/newsletter/{id}/send
pub async fn send_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.newsletter_service.send_issue(id).await?;
    Ok(Json(json!({
        "message": report.message(),
        "sent": report.sent,
        "total": report.total,
        "failures": report.failures,
    })))
}
