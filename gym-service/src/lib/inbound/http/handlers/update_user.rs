use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::get_user::parse_user_id;
use super::get_user::UserResponseData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::role::models::RoleId;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let command = body.try_into_command()?;

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for a partial user update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role_id: Option<i64>,
    is_active: Option<bool>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        let role_id = match self.role_id {
            Some(id) if id <= 0 => return Err(UserError::RoleRequired),
            other => other.map(RoleId),
        };

        Ok(UpdateUserCommand {
            name: self.name.map(DisplayName::new).transpose()?,
            email: self.email.map(EmailAddress::new).transpose()?,
            password: self.password.map(Password::new).transpose()?,
            role_id,
            is_active: self.is_active,
        })
    }
}
