use auth::PasswordPolicyError;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Open a session: access token in the body, refresh token in an HttpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<([(HeaderName, String); 1], ApiSuccess<LoginResponseData>), ApiError> {
    let (email, password) = body.validate()?;

    let outcome = state
        .session_service
        .login(&email, &password)
        .await
        .map_err(ApiError::from)?;

    let role = match state.role_service.get_role(&outcome.user.role_id).await {
        Ok(role) => Some(role.name.as_str().to_string()),
        Err(e) => {
            tracing::warn!(
                user_id = %outcome.user.id,
                role_id = %outcome.user.role_id,
                error = %e,
                "Role lookup failed after login"
            );
            None
        }
    };

    let cookie = state.refresh_cookie.set(&outcome.tokens.refresh_token);
    let data = LoginResponseData {
        access_token: outcome.tokens.access_token,
        user: LoginUserData {
            id: outcome.user.id.0,
            email: outcome.user.email.as_str().to_string(),
            role,
            role_id: outcome.user.role_id.0,
        },
    };

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiSuccess::new(StatusCode::OK, data),
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    /// Only presence is checked for the password; the policy applies when it is set.
    fn validate(self) -> Result<(EmailAddress, String), UserError> {
        let email = EmailAddress::new(self.email)?;
        if self.password.is_empty() {
            return Err(PasswordPolicyError::Required.into());
        }
        Ok((email, self.password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub user: LoginUserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginUserData {
    pub id: i64,
    pub email: String,
    pub role: Option<String>,
    pub role_id: i64,
}
