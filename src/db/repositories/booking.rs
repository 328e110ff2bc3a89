//! Session booking repository

use crate::models::{BookingStatus, CreateBookingInput, SessionBooking};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Booking repository trait
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new pending booking
    async fn create(&self, input: &CreateBookingInput) -> Result<SessionBooking>;

    /// Get booking by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<SessionBooking>>;

    /// List bookings, newest first, optionally filtered by status
    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<SessionBooking>>;

    /// Update a booking's status; returns false when the id was absent
    async fn update_status(&self, id: i64, status: BookingStatus) -> Result<bool>;

    /// Delete a booking; returns false when the id was absent
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Counts for the admin stats endpoint: (total, pending, completed)
    async fn stats(&self) -> Result<(i64, i64, i64)>;
}

/// SQLx-based booking repository implementation
pub struct SqlxBookingRepository {
    pool: SqlitePool,
}

impl SqlxBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn BookingRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BookingRepository for SqlxBookingRepository {
    async fn create(&self, input: &CreateBookingInput) -> Result<SessionBooking> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO session_bookings
                (full_name, email, phone_number, session_type, investment_experience,
                 financial_goals, preferred_date, additional_information, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone_number)
        .bind(&input.session_type)
        .bind(&input.investment_experience)
        .bind(&input.financial_goals)
        .bind(input.preferred_date)
        .bind(&input.additional_information)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create booking")?;

        Ok(SessionBooking {
            id: result.last_insert_rowid(),
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            session_type: input.session_type.clone(),
            investment_experience: input.investment_experience.clone(),
            financial_goals: input.financial_goals.clone(),
            preferred_date: input.preferred_date,
            additional_information: input.additional_information.clone(),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<SessionBooking>> {
        let row = sqlx::query("SELECT * FROM session_bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get booking")?;

        row.map(|row| row_to_booking(&row)).transpose()
    }

    async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<SessionBooking>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM session_bookings WHERE status = ? ORDER BY created_at DESC",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM session_bookings ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list bookings")?;

        rows.iter().map(row_to_booking).collect()
    }

    async fn update_status(&self, id: i64, status: BookingStatus) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE session_bookings SET status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update booking status")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM session_bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete booking")?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<(i64, i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END) AS pending,
                SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END) AS completed
            FROM session_bookings
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to load booking stats")?;

        Ok((
            row.get("total"),
            row.try_get("pending").unwrap_or(0),
            row.try_get("completed").unwrap_or(0),
        ))
    }
}

fn row_to_booking(row: &sqlx::sqlite::SqliteRow) -> Result<SessionBooking> {
    let status_str: String = row.get("status");
    let status = BookingStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid booking status: {}", status_str))?;

    Ok(SessionBooking {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone_number: row.get("phone_number"),
        session_type: row.get("session_type"),
        investment_experience: row.get("investment_experience"),
        financial_goals: row.get("financial_goals"),
        preferred_date: row.get("preferred_date"),
        additional_information: row.get("additional_information"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxBookingRepository {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        SqlxBookingRepository::new(pool)
    }

    fn input(name: &str) -> CreateBookingInput {
        CreateBookingInput {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: None,
            session_type: "portfolio-review".to_string(),
            investment_experience: Some("beginner".to_string()),
            financial_goals: "Build a retirement portfolio".to_string(),
            preferred_date: None,
            additional_information: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending() {
        let repo = setup().await;
        let booking = repo.create(&input("Maria")).await.expect("create");

        assert_eq!(booking.status, BookingStatus::Pending);

        let found = repo
            .get_by_id(booking.id)
            .await
            .expect("get")
            .expect("some");
        assert_eq!(found.full_name, "Maria");
        assert_eq!(found.session_type, "portfolio-review");
    }

    #[tokio::test]
    async fn test_status_transitions_and_filtering() {
        let repo = setup().await;
        let first = repo.create(&input("First")).await.expect("create");
        repo.create(&input("Second")).await.expect("create");

        assert!(repo
            .update_status(first.id, BookingStatus::Confirmed)
            .await
            .expect("update"));
        assert!(!repo
            .update_status(9999, BookingStatus::Confirmed)
            .await
            .expect("update missing"));

        let pending = repo
            .list(Some(BookingStatus::Pending))
            .await
            .expect("list");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].full_name, "Second");

        let (total, pending_count, completed) = repo.stats().await.expect("stats");
        assert_eq!((total, pending_count, completed), (2, 1, 0));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let booking = repo.create(&input("Gone")).await.expect("create");

        assert!(repo.delete(booking.id).await.expect("delete"));
        assert!(!repo.delete(booking.id).await.expect("second delete"));
    }
}
