//! Contact message service

use crate::db::repositories::ContactRepository;
use crate::models::{ContactMessage, ContactStatus, CreateContactInput};
use crate::services::email::{contact_notification_body, Mailer};
use std::sync::Arc;
use thiserror::Error;

/// Contact service errors
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Message not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Contact message service
pub struct ContactService {
    repository: Arc<dyn ContactRepository>,
    mailer: Arc<dyn Mailer>,
    admin_address: String,
}

impl ContactService {
    pub fn new(
        repository: Arc<dyn ContactRepository>,
        mailer: Arc<dyn Mailer>,
        admin_address: String,
    ) -> Self {
        Self {
            repository,
            mailer,
            admin_address,
        }
    }

    /// Store a contact message and notify the site owner, best-effort.
    pub async fn submit(&self, input: CreateContactInput) -> Result<ContactMessage, ContactError> {
        if input.name.trim().is_empty() {
            return Err(ContactError::Validation("Name is required".to_string()));
        }
        if input.email.trim().is_empty() {
            return Err(ContactError::Validation("Email is required".to_string()));
        }
        if input.message.trim().is_empty() {
            return Err(ContactError::Validation("Message is required".to_string()));
        }

        let message = self.repository.create(&input).await?;
        tracing::info!(id = message.id, "Contact message received");

        if !self.admin_address.is_empty() {
            let body = contact_notification_body(&message.name, &message.email, &message.message);
            if let Err(error) = self
                .mailer
                .send(&self.admin_address, "New contact message", &body)
                .await
            {
                tracing::warn!(%error, "Failed to send contact notification");
            }
        }

        Ok(message)
    }

    pub async fn list(&self) -> Result<Vec<ContactMessage>, ContactError> {
        Ok(self.repository.list().await?)
    }

    pub async fn update_status(&self, id: i64, status: ContactStatus) -> Result<(), ContactError> {
        if !self.repository.update_status(id, status).await? {
            return Err(ContactError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContactError> {
        if !self.repository.delete(id).await? {
            return Err(ContactError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxContactRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::services::email::LogMailer;

    async fn setup() -> ContactService {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        ContactService::new(
            SqlxContactRepository::boxed(pool),
            Arc::new(LogMailer),
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_submit_and_triage() {
        let service = setup().await;
        let message = service
            .submit(CreateContactInput {
                name: "Partner".to_string(),
                email: "partner@example.com".to_string(),
                company: None,
                partnership_type: None,
                message: "Let's talk".to_string(),
            })
            .await
            .expect("submit");
        assert_eq!(message.status, ContactStatus::New);

        service
            .update_status(message.id, ContactStatus::Read)
            .await
            .expect("update");
        assert_eq!(service.list().await.expect("list")[0].status, ContactStatus::Read);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let service = setup().await;
        let err = service
            .submit(CreateContactInput {
                name: "X".to_string(),
                email: "x@example.com".to_string(),
                company: None,
                partnership_type: None,
                message: "".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }
}
