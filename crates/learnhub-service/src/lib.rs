//! # learnhub-service
//!
//! Business-logic facade over the notification record store: creation
//! (single and bulk fan-out), paged queries, read-state transitions, and
//! expiry cleanup. The sole writer and reader of the store.
//!
//! Persistence is the durability boundary; delivery is a separate concern
//! driven by the [`notification::events`] broadcast channel.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::service::NotificationService;
