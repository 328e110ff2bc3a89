//! Database layer
//!
//! SQLite via sqlx with an explicit pool lifecycle: the pool is created once
//! at startup, injected into every repository, and closed on shutdown.
//! Schema management is code-based (see [`migrations`]).

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{close_pool, create_pool, create_test_pool};
