//! # learnhub-realtime
//!
//! Real-time WebSocket gateway for LearnHub notifications. Provides:
//!
//! - WebSocket connection management with JWT handshake authentication
//! - Per-user broadcast groups (one user, many devices)
//! - Push of newly created notifications to all of a user's connections
//! - Read-state synchronization across a user's devices
//!
//! Delivery is best-effort by construction: the bridge task consumes domain
//! events emitted after persistence, so a dead or slow socket can never fail
//! a notification write.

pub mod bridge;
pub mod connection;
pub mod message;
pub mod server;

pub use connection::authenticator::{AuthenticatedConnection, WsAuthenticator};
pub use connection::manager::ConnectionManager;
pub use message::{InboundMessage, OutboundMessage};
pub use server::RealtimeEngine;
