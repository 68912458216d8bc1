//! # learnhub-database
//!
//! PostgreSQL access layer: connection pool management, migration runner,
//! and the notification repository.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::notification::NotificationRepository;
