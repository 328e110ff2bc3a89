//! Data models
//!
//! One canonical schema per entity, shared by repositories, services and
//! API handlers.

pub mod article;
pub mod booking;
pub mod contact;
pub mod newsletter;
pub mod page;
pub mod user;

pub use article::{
    Article, ArticleFilter, ArticleStatus, ArticleSummary, Category, CreateArticleInput,
    PagedResult, UpdateArticleInput,
};
pub use booking::{BookingStatus, CreateBookingInput, SessionBooking};
pub use contact::{ContactMessage, ContactStatus, CreateContactInput};
pub use newsletter::{
    CreateIssueInput, IssueStatus, IssueSummary, NewsletterIssue, Subscriber, SubscriberStatus,
};
pub use page::{ContentBlock, PageName, StaticPage};
pub use user::{AdminClaims, AdminUser};
