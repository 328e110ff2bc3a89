//! Service layer
//!
//! Domain logic between the HTTP handlers and the repositories. Each
//! service carries its own error enum; handlers map those onto HTTP status
//! codes.

pub mod article;
pub mod auth;
pub mod booking;
pub mod contact;
pub mod email;
pub mod newsletter;
pub mod page;
pub mod password;

pub use article::{ArticleError, ArticleService};
pub use auth::{AuthError, AuthService, LoginResponse};
pub use booking::{BookingError, BookingService};
pub use contact::{ContactError, ContactService};
pub use email::{build_mailer, Mailer};
pub use newsletter::{DispatchReport, NewsletterError, NewsletterService};
pub use page::{PageError, PageService};
