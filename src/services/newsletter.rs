//! Newsletter service
//!
//! Subscriptions, uploaded issues, and the fan-out send. A send loads the
//! active subscriber list once, delivers per subscriber, and records the
//! outcome on the issue exactly once. Individual delivery failures do not
//! abort the run.

use crate::db::repositories::{IssueRepository, SubscriberRepository};
use crate::models::{
    CreateIssueInput, IssueSummary, NewsletterIssue, Subscriber, SubscriberStatus,
};
use crate::services::email::{is_valid_email, issue_body, welcome_body, Mailer};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

/// Newsletter service errors
#[derive(Debug, Error)]
pub enum NewsletterError {
    #[error("Newsletter issue not found")]
    IssueNotFound,

    #[error("Subscriber not found")]
    SubscriberNotFound,

    #[error("Email already subscribed")]
    AlreadySubscribed,

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("No active subscribers to send to")]
    NoActiveSubscribers,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Outcome of a fan-out send.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DispatchReport {
    /// Deliveries that succeeded
    pub sent: i64,
    /// Total active subscribers at the start of the run
    pub total: i64,
    /// Addresses that failed, with the failure reason
    pub failures: Vec<DispatchFailure>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DispatchFailure {
    pub email: String,
    pub reason: String,
}

impl DispatchReport {
    pub fn message(&self) -> String {
        format!("Newsletter sent to {} of {} subscribers", self.sent, self.total)
    }
}

/// Newsletter service
pub struct NewsletterService {
    subscribers: Arc<dyn SubscriberRepository>,
    issues: Arc<dyn IssueRepository>,
    mailer: Arc<dyn Mailer>,
    site_url: String,
}

impl NewsletterService {
    pub fn new(
        subscribers: Arc<dyn SubscriberRepository>,
        issues: Arc<dyn IssueRepository>,
        mailer: Arc<dyn Mailer>,
        site_url: String,
    ) -> Self {
        Self {
            subscribers,
            issues,
            mailer,
            site_url,
        }
    }

    /// Subscribe an email address. The welcome email is best-effort: a
    /// delivery failure is logged and the subscription still succeeds.
    pub async fn subscribe(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<Subscriber, NewsletterError> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(NewsletterError::InvalidEmail);
        }

        if self.subscribers.get_by_email(&email).await?.is_some() {
            return Err(NewsletterError::AlreadySubscribed);
        }

        let subscriber = self.subscribers.create(&email, name).await?;
        tracing::info!(email = %subscriber.email, "New newsletter subscriber");

        let body = welcome_body(name, &self.site_url);
        if let Err(error) = self
            .mailer
            .send(&subscriber.email, "Welcome to The Diary of an Investor", &body)
            .await
        {
            tracing::warn!(email = %subscriber.email, %error, "Failed to send welcome email");
        }

        Ok(subscriber)
    }

    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>, NewsletterError> {
        Ok(self.subscribers.list().await?)
    }

    pub async fn remove_subscriber(&self, id: i64) -> Result<(), NewsletterError> {
        if !self.subscribers.delete(id).await? {
            return Err(NewsletterError::SubscriberNotFound);
        }
        Ok(())
    }

    /// Store an uploaded issue.
    pub async fn create_issue(
        &self,
        input: CreateIssueInput,
    ) -> Result<NewsletterIssue, NewsletterError> {
        if input.title.trim().is_empty() {
            return Err(NewsletterError::Validation("Title is required".to_string()));
        }
        if input.file_url.is_empty() {
            return Err(NewsletterError::Validation("A file is required".to_string()));
        }

        let issue = self.issues.create(&input).await?;
        tracing::info!(id = issue.id, title = %issue.title, "Newsletter issue uploaded");
        Ok(issue)
    }

    pub async fn list_issues(
        &self,
        published_only: bool,
    ) -> Result<Vec<IssueSummary>, NewsletterError> {
        Ok(self.issues.list(published_only).await?)
    }

    pub async fn get_issue(&self, id: i64) -> Result<NewsletterIssue, NewsletterError> {
        self.issues
            .get_by_id(id)
            .await?
            .ok_or(NewsletterError::IssueNotFound)
    }

    /// Counts for the admin stats endpoint: (total, active)
    pub async fn subscriber_stats(&self) -> Result<(i64, i64), NewsletterError> {
        Ok(self.subscribers.stats().await?)
    }

    /// Total stored issue count for the admin stats endpoint.
    pub async fn issue_count(&self) -> Result<i64, NewsletterError> {
        Ok(self.issues.count().await?)
    }

    pub async fn delete_issue(&self, id: i64) -> Result<(), NewsletterError> {
        if !self.issues.delete(id).await? {
            return Err(NewsletterError::IssueNotFound);
        }
        Ok(())
    }

    /// Send an issue to every active subscriber.
    ///
    /// With zero active subscribers the send is refused and the issue left
    /// untouched. Otherwise each failure is recorded and the loop continues;
    /// the issue is updated once at the end with the send time and count.
    pub async fn send_issue(&self, id: i64) -> Result<DispatchReport, NewsletterError> {
        let issue = self.get_issue(id).await?;

        let recipients = self
            .subscribers
            .list_by_status(SubscriberStatus::Active)
            .await?;
        if recipients.is_empty() {
            return Err(NewsletterError::NoActiveSubscribers);
        }

        let total = recipients.len() as i64;
        let subject = format!("New Issue: {}", issue.title);
        let mut sent = 0i64;
        let mut failures = Vec::new();

        for subscriber in &recipients {
            let body = issue_body(&issue, subscriber.name.as_deref(), &self.site_url);
            match self.mailer.send(&subscriber.email, &subject, &body).await {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::warn!(email = %subscriber.email, %error, "Failed to deliver newsletter");
                    failures.push(DispatchFailure {
                        email: subscriber.email.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        self.issues.mark_sent(issue.id, Utc::now(), sent).await?;
        tracing::info!(
            id = issue.id,
            sent,
            total,
            failed = failures.len(),
            "Newsletter send finished"
        );

        Ok(DispatchReport { sent, total, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxIssueRepository, SqlxSubscriberRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::IssueStatus;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every send; addresses listed in `fail` are rejected.
    struct FakeMailer {
        sent: Mutex<Vec<(String, String)>>,
        fail: Vec<String>,
    }

    impl FakeMailer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: Vec::new(),
            })
        }

        fn failing(addresses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: addresses.iter().map(|a| a.to_string()).collect(),
            })
        }

        fn sent_to(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(to, _)| to.clone()).collect()
        }
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send(&self, to: &str, subject: &str, _html_body: &str) -> anyhow::Result<()> {
            if self.fail.iter().any(|a| a == to) {
                return Err(anyhow!("mailbox unavailable"));
            }
            self.sent.lock().unwrap().push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    async fn setup(mailer: Arc<FakeMailer>) -> NewsletterService {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");
        NewsletterService::new(
            SqlxSubscriberRepository::boxed(pool.clone()),
            SqlxIssueRepository::boxed(pool),
            mailer,
            "https://example.com".to_string(),
        )
    }

    fn issue_input(title: &str) -> CreateIssueInput {
        CreateIssueInput {
            title: title.to_string(),
            description: None,
            file_url: "data:application/pdf;base64,AAAA".to_string(),
            file_name: "issue.pdf".to_string(),
            file_size: 4,
            issue_date: None,
            status: IssueStatus::Published,
        }
    }

    #[tokio::test]
    async fn test_subscribe_sends_welcome() {
        let mailer = FakeMailer::new();
        let service = setup(mailer.clone()).await;

        let sub = service
            .subscribe("Reader@Example.com", Some("Reader"))
            .await
            .expect("subscribe");
        assert_eq!(sub.email, "reader@example.com");
        assert_eq!(mailer.sent_to(), vec!["reader@example.com"]);
    }

    #[tokio::test]
    async fn test_subscribe_survives_welcome_failure() {
        let mailer = FakeMailer::failing(&["fragile@example.com"]);
        let service = setup(mailer).await;

        let sub = service
            .subscribe("fragile@example.com", None)
            .await
            .expect("subscribe despite mail failure");
        assert_eq!(sub.email, "fragile@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_subscription_rejected() {
        let service = setup(FakeMailer::new()).await;
        service.subscribe("a@example.com", None).await.expect("first");

        let err = service.subscribe("A@Example.COM", None).await.unwrap_err();
        assert!(matches!(err, NewsletterError::AlreadySubscribed));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let service = setup(FakeMailer::new()).await;
        for bad in ["", "plain", "no@tld", "two@@example.com", "has space@example.com"] {
            let err = service.subscribe(bad, None).await.unwrap_err();
            assert!(matches!(err, NewsletterError::InvalidEmail), "{:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_send_with_no_subscribers_refused() {
        let service = setup(FakeMailer::new()).await;
        let issue = service.create_issue(issue_input("April")).await.expect("create");

        let err = service.send_issue(issue.id).await.unwrap_err();
        assert!(matches!(err, NewsletterError::NoActiveSubscribers));

        // Issue untouched.
        let reloaded = service.get_issue(issue.id).await.expect("get");
        assert!(reloaded.sent_at.is_none());
        assert!(reloaded.sent_count.is_none());
    }

    #[tokio::test]
    async fn test_send_fans_out_to_active_subscribers() {
        let mailer = FakeMailer::new();
        let service = setup(mailer.clone()).await;
        service.subscribe("a@example.com", None).await.expect("sub");
        service.subscribe("b@example.com", None).await.expect("sub");
        let issue = service.create_issue(issue_input("May")).await.expect("create");

        let report = service.send_issue(issue.id).await.expect("send");
        assert_eq!(report.sent, 2);
        assert_eq!(report.total, 2);
        assert!(report.failures.is_empty());
        assert_eq!(report.message(), "Newsletter sent to 2 of 2 subscribers");

        let reloaded = service.get_issue(issue.id).await.expect("get");
        assert_eq!(reloaded.sent_count, Some(2));
        assert!(reloaded.sent_at.is_some());

        // Two welcome emails plus two issue emails.
        assert_eq!(mailer.sent_to().len(), 4);
    }

    #[tokio::test]
    async fn test_send_continues_past_failures() {
        let mailer = FakeMailer::failing(&["broken@example.com"]);
        let service = setup(mailer).await;
        service.subscribe("a@example.com", None).await.expect("sub");
        service.subscribe("broken@example.com", None).await.expect("sub");
        service.subscribe("b@example.com", None).await.expect("sub");
        let issue = service.create_issue(issue_input("June")).await.expect("create");

        let report = service.send_issue(issue.id).await.expect("send");
        assert_eq!(report.sent, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].email, "broken@example.com");
        assert_eq!(report.message(), "Newsletter sent to 2 of 3 subscribers");

        // Only successful deliveries are counted on the issue.
        let reloaded = service.get_issue(issue.id).await.expect("get");
        assert_eq!(reloaded.sent_count, Some(2));
    }

    #[tokio::test]
    async fn test_send_missing_issue() {
        let service = setup(FakeMailer::new()).await;
        let err = service.send_issue(404).await.unwrap_err();
        assert!(matches!(err, NewsletterError::IssueNotFound));
    }
}
