use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Value of the `type` claim carried by every refresh token.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Payload of a short-lived access token.
///
/// `sub` holds the numeric user id rendered as a string, as required by RFC 7519.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub role_id: i64,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    /// Build access claims issued now and expiring after `ttl`.
    pub fn new(user_id: i64, email: impl Into<String>, role_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            role_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Numeric user id carried in `sub`.
    ///
    /// # Errors
    /// * `InvalidToken` - Subject is not a numeric id
    pub fn user_id(&self) -> Result<i64, JwtError> {
        parse_subject(&self.sub)
    }
}

/// Payload of a long-lived refresh token.
///
/// `jti` makes every issued token unique, so two tokens minted for the same user within
/// the same second never share a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    #[serde(rename = "type", default)]
    pub token_type: String,
    #[serde(default)]
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl RefreshClaims {
    /// Build refresh claims issued now and expiring after `ttl`.
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<i64, JwtError> {
        parse_subject(&self.sub)
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == REFRESH_TOKEN_TYPE
    }
}

fn parse_subject(sub: &str) -> Result<i64, JwtError> {
    sub.parse::<i64>()
        .map_err(|_| JwtError::InvalidToken(format!("subject '{}' is not a user id", sub)))
}
