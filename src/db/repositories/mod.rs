//! Repository layer
//!
//! One trait per entity plus a `Sqlx*Repository` implementation. Services
//! depend on the traits so tests can substitute in-memory fakes.

pub mod article;
pub mod booking;
pub mod contact;
pub mod issue;
pub mod page;
pub mod subscriber;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use booking::{BookingRepository, SqlxBookingRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use issue::{IssueRepository, SqlxIssueRepository};
pub use page::{PageRepository, SqlxPageRepository};
pub use subscriber::{SqlxSubscriberRepository, SubscriberRepository};
pub use user::{AdminUserRepository, SqlxAdminUserRepository};
