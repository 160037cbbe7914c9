use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::get_user::UserResponseData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::role::models::RoleId;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    role_id: Option<i64>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, UserError> {
        let name = DisplayName::new(self.name)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let role_id = match self.role_id {
            Some(id) if id > 0 => RoleId(id),
            _ => return Err(UserError::RoleRequired),
        };
        Ok(CreateUserCommand::new(name, email, password, role_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role_id: Option<i64>) -> CreateUserRequest {
        CreateUserRequest {
            name: "Ana Pérez".to_string(),
            email: "ana@example.com".to_string(),
            password: "Valid123".to_string(),
            role_id,
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request(Some(3)).try_into_command().unwrap();

        assert_eq!(command.role_id, RoleId(3));
        assert_eq!(command.email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_role_is_required() {
        assert!(matches!(
            request(None).try_into_command(),
            Err(UserError::RoleRequired)
        ));
        assert!(matches!(
            request(Some(0)).try_into_command(),
            Err(UserError::RoleRequired)
        ));
    }

    #[test]
    fn test_weak_password_rejected() {
        let mut body = request(Some(3));
        body.password = "alllowercase1".to_string();

        assert!(matches!(
            body.try_into_command(),
            Err(UserError::InvalidPassword(_))
        ));
    }
}
