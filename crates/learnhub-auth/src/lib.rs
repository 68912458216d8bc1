//! # learnhub-auth
//!
//! Bearer-token verification for the notification service. Tokens are
//! issued by the external identity provider and verified here against the
//! shared HMAC secret; this crate never creates identities.

pub mod jwt;

pub use jwt::claims::Claims;
pub use jwt::decoder::JwtDecoder;
pub use jwt::encoder::JwtEncoder;
