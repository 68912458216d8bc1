//! Connection lifecycle: handles, the user-indexed pool, and the manager.

pub mod authenticator;
pub mod handle;
pub mod manager;
pub mod pool;
