//! Contact message API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{ContactMessage, ContactStatus, CreateContactInput};

/// Request body for updating a message's triage status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<CreateContactInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let message = state.contact_service.submit(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Message sent successfully",
            "contact": message,
        })),
    ))
}

/// GET /api/contact
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    Ok(Json(state.contact_service.list().await?))
}

/// PATCH /api/contact/{id}
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let status = ContactStatus::from_str(&body.status)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown contact status: {}", body.status)))?;
    state.contact_service.update_status(id, status).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/contact/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.contact_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
