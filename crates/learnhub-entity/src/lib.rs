//! # learnhub-entity
//!
//! Entity types for the LearnHub notification service. Plain data structures
//! mapped to database rows and wire payloads; no business logic beyond
//! per-entity helpers.

pub mod notification;
pub mod user;

pub use notification::{BulkNotification, NewNotification, Notification};
pub use user::UserRole;
