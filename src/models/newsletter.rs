//! Newsletter models: subscribers and uploaded issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Newsletter subscriber, unique by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub status: SubscriberStatus,
    pub created_at: DateTime<Utc>,
}

/// Subscriber lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    Active,
    Inactive,
}

impl Default for SubscriberStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl SubscriberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriberStatus::Active => "active",
            SubscriberStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(SubscriberStatus::Active),
            "inactive" => Some(SubscriberStatus::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single newsletter publication (PDF plus metadata).
///
/// `file_url` is either an external reference URL or the inline payload as a
/// base64 `data:` URL; list responses exclude it because of its size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterIssue {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub issue_date: DateTime<Utc>,
    pub status: IssueStatus,
    /// Set exactly once after a send operation
    pub sent_at: Option<DateTime<Utc>>,
    pub sent_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Issue listing row without the file payload.
#[derive(Debug, Clone, Serialize)]
pub struct IssueSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub issue_date: DateTime<Utc>,
    pub status: IssueStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub sent_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<NewsletterIssue> for IssueSummary {
    fn from(issue: NewsletterIssue) -> Self {
        Self {
            id: issue.id,
            title: issue.title,
            description: issue.description,
            file_name: issue.file_name,
            file_size: issue.file_size,
            issue_date: issue.issue_date,
            status: issue.status,
            sent_at: issue.sent_at,
            sent_count: issue.sent_count,
            created_at: issue.created_at,
        }
    }
}

/// Issue publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Draft,
    Published,
}

impl Default for IssueStatus {
    fn default() -> Self {
        Self::Published
    }
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Draft => "draft",
            IssueStatus::Published => "published",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(IssueStatus::Draft),
            "published" => Some(IssueStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for storing an uploaded issue.
#[derive(Debug, Clone)]
pub struct CreateIssueInput {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub issue_date: Option<DateTime<Utc>>,
    pub status: IssueStatus,
}
