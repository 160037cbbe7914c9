use std::sync::Arc;

use async_trait::async_trait;
use auth::JwtError;
use auth::TokenCodec;
use chrono::Utc;

use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::NewRefreshToken;
use crate::domain::session::models::SessionPolicy;
use crate::domain::session::models::SessionTokens;
use crate::domain::session::models::TokenHash;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::session::errors::SessionError;
use crate::session::ports::RefreshTokenRepository;
use crate::session::ports::SessionServicePort;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// Session lifecycle: login, refresh rotation and logout.
///
/// A user holds at most one live refresh token: login revokes every previous token and
/// refresh revokes the one it consumes.
pub struct SessionService<US, RR>
where
    US: UserServicePort,
    RR: RefreshTokenRepository,
{
    users: Arc<US>,
    refresh_tokens: Arc<RR>,
    codec: TokenCodec,
    policy: SessionPolicy,
}

impl<US, RR> SessionService<US, RR>
where
    US: UserServicePort,
    RR: RefreshTokenRepository,
{
    pub fn new(
        users: Arc<US>,
        refresh_tokens: Arc<RR>,
        codec: TokenCodec,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            codec,
            policy,
        }
    }

    /// Mint a token pair for `user` and persist the refresh digest.
    async fn issue_tokens(&self, user: &User) -> Result<SessionTokens, SessionError> {
        let access_token = self
            .codec
            .issue_access_token(
                user.id.0,
                user.email.as_str(),
                user.role_id.0,
                self.policy.access_ttl,
            )
            .map_err(|e| SessionError::TokenIssuance(e.to_string()))?;

        let refresh_token = self
            .codec
            .issue_refresh_token(user.id.0, self.policy.refresh_ttl)
            .map_err(|e| SessionError::TokenIssuance(e.to_string()))?;

        let now = Utc::now();
        self.refresh_tokens
            .save(NewRefreshToken {
                user_id: user.id,
                token_hash: TokenHash::of(&refresh_token),
                expires_at: now + self.policy.refresh_ttl,
                created_at: now,
            })
            .await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }
}

#[async_trait]
impl<US, RR> SessionServicePort for SessionService<US, RR>
where
    US: UserServicePort,
    RR: RefreshTokenRepository,
{
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        let user = self.users.authenticate(email, password).await?;

        // Concurrent logins may revoke each other's token; the last one wins.
        match self.refresh_tokens.revoke_all_by_user(&user.id).await {
            Ok(revoked) => {
                tracing::debug!(user_id = %user.id, revoked, "Previous sessions revoked")
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Failed to revoke previous sessions")
            }
        }

        let tokens = self.issue_tokens(&user).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome { tokens, user })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, SessionError> {
        let token_hash = TokenHash::of(refresh_token);

        let record = self
            .refresh_tokens
            .find_by_hash(&token_hash)
            .await?
            .ok_or(SessionError::InvalidRefreshToken)?;

        if record.is_expired_at(Utc::now()) {
            tracing::debug!(user_id = %record.user_id, "Stored refresh token expired");
            return Err(SessionError::ExpiredRefreshToken);
        }

        let claims = self
            .codec
            .verify_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired => SessionError::ExpiredRefreshToken,
                _ => SessionError::InvalidRefreshToken,
            })?;

        if claims.user_id().ok() != Some(record.user_id.0) {
            tracing::warn!(user_id = %record.user_id, "Refresh token subject does not match owner");
            return Err(SessionError::InvalidRefreshToken);
        }

        let user = match self.users.get_user(&record.user_id).await {
            Ok(user) => user,
            Err(UserError::NotFound(_)) => return Err(SessionError::InvalidRefreshToken),
            Err(e) => return Err(e.into()),
        };

        if !user.is_active {
            return Err(SessionError::UserInactive);
        }

        // Only the request that actually revokes the token may rotate it.
        if self.refresh_tokens.revoke_by_hash(&token_hash).await? == 0 {
            tracing::warn!(user_id = %user.id, "Refresh token already consumed");
            return Err(SessionError::InvalidRefreshToken);
        }
        let tokens = self.issue_tokens(&user).await?;

        tracing::info!(user_id = %user.id, "Session refreshed");
        Ok(tokens)
    }

    async fn logout(&self, refresh_token: &str) {
        if let Err(e) = self
            .refresh_tokens
            .revoke_by_hash(&TokenHash::of(refresh_token))
            .await
        {
            tracing::warn!(error = %e, "Failed to revoke refresh token on logout");
        }
    }

    async fn logout_all(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let revoked = self.refresh_tokens.revoke_all_by_user(user_id).await?;

        tracing::info!(user_id = %user_id, revoked, "All sessions closed");
        Ok(revoked)
    }
}
