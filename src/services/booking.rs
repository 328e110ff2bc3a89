//! Session booking service

use crate::db::repositories::BookingRepository;
use crate::models::{BookingStatus, CreateBookingInput, SessionBooking};
use crate::services::email::{booking_notification_body, is_valid_email, Mailer};
use std::sync::Arc;
use thiserror::Error;

/// Booking service errors
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Session booking service
pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    mailer: Arc<dyn Mailer>,
    admin_address: String,
}

impl BookingService {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        mailer: Arc<dyn Mailer>,
        admin_address: String,
    ) -> Self {
        Self {
            repository,
            mailer,
            admin_address,
        }
    }

    /// Create a booking and notify the site owner. The notification is
    /// best-effort.
    pub async fn create(&self, input: CreateBookingInput) -> Result<SessionBooking, BookingError> {
        if input.full_name.trim().is_empty() {
            return Err(BookingError::Validation("Full name is required".to_string()));
        }
        if !is_valid_email(input.email.trim()) {
            return Err(BookingError::Validation(
                "Please provide a valid email address".to_string(),
            ));
        }
        if input.session_type.trim().is_empty() {
            return Err(BookingError::Validation("Session type is required".to_string()));
        }
        if input.financial_goals.trim().is_empty() {
            return Err(BookingError::Validation(
                "Financial goals are required".to_string(),
            ));
        }

        let booking = self.repository.create(&input).await?;
        tracing::info!(id = booking.id, session_type = %booking.session_type, "Session booked");

        if !self.admin_address.is_empty() {
            let body =
                booking_notification_body(&booking.full_name, &booking.email, &booking.session_type);
            if let Err(error) = self
                .mailer
                .send(&self.admin_address, "New session booking", &body)
                .await
            {
                tracing::warn!(%error, "Failed to send booking notification");
            }
        }

        Ok(booking)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<SessionBooking, BookingError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(BookingError::NotFound)
    }

    pub async fn list(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<SessionBooking>, BookingError> {
        Ok(self.repository.list(status).await?)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<SessionBooking, BookingError> {
        if !self.repository.update_status(id, status).await? {
            return Err(BookingError::NotFound);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), BookingError> {
        if !self.repository.delete(id).await? {
            return Err(BookingError::NotFound);
        }
        Ok(())
    }

    /// Counts for the admin stats endpoint: (total, pending, completed)
    pub async fn stats(&self) -> Result<(i64, i64, i64), BookingError> {
        Ok(self.repository.stats().await?)
    }
}
