//! WebSocket handshake authentication via JWT query-parameter token.

use std::sync::Arc;

use uuid::Uuid;

use learnhub_auth::jwt::JwtDecoder;
use learnhub_core::error::AppError;
use learnhub_entity::user::UserRole;

/// Authenticated connection info extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthenticatedConnection {
    /// User ID.
    pub user_id: Uuid,
    /// User role.
    pub role: UserRole,
    /// Username.
    pub username: String,
}

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Validates the handshake token and resolves the connecting identity.
    ///
    /// Async so callers can bound it with a timeout; token verification is
    /// local today, but this is the seam where a remote identity provider
    /// would be consulted.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedConnection, AppError> {
        let claims = self.decoder.decode_access_token(token)?;

        Ok(AuthenticatedConnection {
            user_id: claims.user_id(),
            role: claims.role,
            username: claims.username,
        })
    }
}
