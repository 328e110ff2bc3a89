//! Static page model
//!
//! One record per page name (upsert semantics). The content field is an
//! opaque JSON blob owned by the frontend; content blocks are an optional
//! ordered list of named fragments within a page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of static pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageName {
    About,
    Contact,
    Newsletter,
    BookSession,
    Tools,
}

impl PageName {
    pub const ALL: [PageName; 5] = [
        PageName::About,
        PageName::Contact,
        PageName::Newsletter,
        PageName::BookSession,
        PageName::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageName::About => "about",
            PageName::Contact => "contact",
            PageName::Newsletter => "newsletter",
            PageName::BookSession => "book-session",
            PageName::Tools => "tools",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    /// Human-readable title, e.g. `book-session` -> `Book Session`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for PageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named content fragment within a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Generated identifier
    pub id: String,
    /// Block type tag (hero, text, cta, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordering hint within the page
    pub position: String,
    /// Opaque block content
    pub content: serde_json::Value,
}

impl ContentBlock {
    pub fn new(kind: String, position: String, content: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            position,
            content,
        }
    }
}

/// Static page entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPage {
    pub page: PageName,
    /// Opaque structured content
    pub content: serde_json::Value,
    /// Optional ordered list of content blocks
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaticPage {
    /// Synthesized default returned when a page has never been saved.
    /// The public read path never 404s for a known page name.
    pub fn placeholder(page: PageName) -> Self {
        let now = Utc::now();
        Self {
            page,
            content: serde_json::json!({
                "title": page.title(),
                "placeholder": true,
            }),
            blocks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
