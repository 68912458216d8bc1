//! Database repositories.

pub mod notification;
