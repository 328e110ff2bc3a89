//! Investor Diary - content and newsletter backend
//!
//! This library provides the core functionality for the Investor Diary
//! financial education site: articles, static pages, newsletter
//! distribution, session bookings and admin authentication.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
