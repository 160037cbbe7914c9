use async_trait::async_trait;

use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::NewRefreshToken;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::models::SessionTokens;
use crate::domain::session::models::TokenHash;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::session::errors::SessionError;

/// Port for session operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Authenticate and open a new session, closing any previous one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `UserInactive` - Account is deactivated
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<LoginOutcome, SessionError>;

    /// Exchange a refresh token for a new token pair. The presented token is revoked.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Unknown, revoked or tampered token, or owner gone
    /// * `ExpiredRefreshToken` - Token is past its expiry
    /// * `UserInactive` - Owner was deactivated
    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, SessionError>;

    /// Revoke a refresh token. Never fails.
    async fn logout(&self, refresh_token: &str);

    /// Revoke every refresh token of a user.
    ///
    /// # Returns
    /// Number of tokens revoked
    async fn logout_all(&self, user_id: &UserId) -> Result<u64, SessionError>;
}

/// Port for refresh token persistence.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// # Errors
    /// * `TokenConflict` - Digest already stored
    async fn save(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, SessionError>;

    /// Find a non-revoked token by digest. Expired tokens are still returned.
    async fn find_by_hash(
        &self,
        token_hash: &TokenHash,
    ) -> Result<Option<RefreshTokenRecord>, SessionError>;

    /// Idempotent; returns the number of tokens revoked, zero when the token is unknown or
    /// was already revoked.
    async fn revoke_by_hash(&self, token_hash: &TokenHash) -> Result<u64, SessionError>;

    /// Idempotent; returns the number of tokens revoked, possibly zero.
    async fn revoke_all_by_user(&self, user_id: &UserId) -> Result<u64, SessionError>;
}
