//! Session booking API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{BookingStatus, CreateBookingInput, SessionBooking};

/// Query parameters for listing bookings
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
}

/// Request body for updating a booking's status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBookingInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let booking = state.booking_service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Session booking submitted successfully",
            "booking": booking,
        })),
    ))
}

/// GET /api/sessions
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<SessionBooking>>, ApiError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    Ok(Json(state.booking_service.list(status).await?))
}

/// GET /api/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SessionBooking>, ApiError> {
    Ok(Json(state.booking_service.get_by_id(id).await?))
}

/// PATCH /api/sessions/{id}
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<SessionBooking>, ApiError> {
    let status = parse_status(&body.status)?;
    Ok(Json(state.booking_service.update_status(id, status).await?))
}

/// DELETE /api/sessions/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.booking_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_status(raw: &str) -> Result<BookingStatus, ApiError> {
    BookingStatus::from_str(raw)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown booking status: {}", raw)))
}
