//! Outgoing email
//!
//! A small `Mailer` trait hides the transport so services can be tested
//! with a recording fake. The SMTP implementation uses lettre; when no SMTP
//! host is configured a log-only mailer is used instead so local setups
//! work without a mail server.

use crate::config::EmailConfig;
use crate::models::NewsletterIssue;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Shared address-format check used by the public intake forms.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Sends a single email. Implementations must be safe to call concurrently.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// SMTP mailer backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP host: {}", config.smtp_host))?
            .port(config.smtp_port);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .with_context(|| format!("Invalid from address: {}", config.from_address))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().with_context(|| format!("Invalid recipient: {}", to))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("Failed to build email")?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("Failed to send email to {}", to))?;

        Ok(())
    }
}

/// Log-only mailer used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<()> {
        tracing::info!(to, subject, "SMTP not configured, logging email instead of sending");
        Ok(())
    }
}

/// Build the mailer the configuration asks for.
pub fn build_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>> {
    if config.smtp_host.is_empty() {
        tracing::warn!("No SMTP host configured, outgoing email will only be logged");
        Ok(Arc::new(LogMailer))
    } else {
        Ok(Arc::new(SmtpMailer::new(config)?))
    }
}

/// Welcome email sent after a successful subscription.
pub fn welcome_body(name: Option<&str>, site_url: &str) -> String {
    let greeting = match name {
        Some(name) if !name.is_empty() => format!("Hi {},", name),
        _ => "Hi,".to_string(),
    };
    format!(
        "<h2>Welcome to The Diary of an Investor</h2>\
         <p>{greeting}</p>\
         <p>Thanks for subscribing. You will receive each new issue of the \
         newsletter straight to this inbox.</p>\
         <p>In the meantime you can browse past issues and articles at \
         <a href=\"{site_url}\">{site_url}</a>.</p>"
    )
}

/// Body for a newsletter issue announcement.
pub fn issue_body(issue: &NewsletterIssue, name: Option<&str>, site_url: &str) -> String {
    let greeting = match name {
        Some(name) if !name.is_empty() => format!("Hi {},", name),
        _ => "Hi,".to_string(),
    };
    let description = issue
        .description
        .as_deref()
        .map(|d| format!("<p>{}</p>", d))
        .unwrap_or_default();
    format!(
        "<h2>{title}</h2>\
         <p>{greeting}</p>\
         {description}\
         <p>The latest issue is out. Read it on the site: \
         <a href=\"{site_url}/newsletter\">{site_url}/newsletter</a></p>",
        title = issue.title,
    )
}

/// Notification sent to the site owner when a contact message arrives.
pub fn contact_notification_body(name: &str, email: &str, message: &str) -> String {
    format!(
        "<h3>New contact message</h3>\
         <p><strong>From:</strong> {name} ({email})</p>\
         <p>{message}</p>"
    )
}

/// Notification sent to the site owner when a session is booked.
pub fn booking_notification_body(full_name: &str, email: &str, session_type: &str) -> String {
    format!(
        "<h3>New session booking</h3>\
         <p><strong>From:</strong> {full_name} ({email})</p>\
         <p><strong>Session:</strong> {session_type}</p>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_body_uses_name_when_present() {
        let body = welcome_body(Some("Maria"), "https://example.com");
        assert!(body.contains("Hi Maria,"));
        assert!(body.contains("https://example.com"));

        let anonymous = welcome_body(None, "https://example.com");
        assert!(anonymous.contains("Hi,"));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("reader@example.com"));
        for bad in ["", "plain", "no@tld", "two@@example.com", "has space@example.com"] {
            assert!(!is_valid_email(bad), "{:?}", bad);
        }
    }

    #[test]
    fn test_build_mailer_without_host_is_log_only() {
        let config = EmailConfig::default();
        assert!(config.smtp_host.is_empty());
        assert!(build_mailer(&config).is_ok());
    }
}
