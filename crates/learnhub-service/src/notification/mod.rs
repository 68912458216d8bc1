//! Notification business logic.

pub mod events;
pub mod service;
pub mod store;
pub mod sweeper;
