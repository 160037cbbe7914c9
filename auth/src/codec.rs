use chrono::Duration;

use crate::digest::hash_token;
use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;

/// Issues and verifies the two token kinds used for sessions.
///
/// Access tokens carry identity and role and are never stored. Refresh tokens only carry
/// the subject and are persisted by the caller as [`TokenCodec::digest`].
#[derive(Clone)]
pub struct TokenCodec {
    jwt_handler: JwtHandler,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
        }
    }

    /// Sign an access token for a user.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_access_token(
        &self,
        user_id: i64,
        email: &str,
        role_id: i64,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.jwt_handler
            .encode(&AccessClaims::new(user_id, email, role_id, ttl))
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Valid signature, past expiry
    /// * `InvalidToken` - Anything else, including a refresh token presented as access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let claims: AccessClaims = self.jwt_handler.decode(token)?;
        claims.user_id()?;
        Ok(claims)
    }

    /// Sign a refresh token for a user.
    pub fn issue_refresh_token(&self, user_id: i64, ttl: Duration) -> Result<String, JwtError> {
        self.jwt_handler.encode(&RefreshClaims::new(user_id, ttl))
    }

    /// Verify a refresh token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Valid signature, past expiry
    /// * `WrongTokenType` - Signed token whose `type` claim is not `refresh`
    /// * `InvalidToken` - Malformed or badly signed token
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let claims: RefreshClaims = self.jwt_handler.decode(token)?;

        if !claims.is_refresh() {
            return Err(JwtError::WrongTokenType(claims.token_type));
        }
        claims.user_id()?;

        Ok(claims)
    }

    /// Storage digest of a raw token.
    pub fn digest(&self, token: &str) -> String {
        hash_token(token)
    }
}
