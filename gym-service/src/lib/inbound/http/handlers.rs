use auth::PasswordPolicyError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::role::errors::RoleError;
use crate::role::errors::RoleNameError;
use crate::session::errors::SessionError;
use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod logout_all;
pub mod refresh_session;
pub mod restore_user;
pub mod roles;
pub mod update_user;

const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// JSON body extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Error rendered as `{"error": {"code", "message"}}`.
///
/// Internal errors are logged and replaced by a generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(&'static str, String),
    Unauthorized(&'static str, String),
    Forbidden(&'static str, String),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(..) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(..) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(..) => StatusCode::FORBIDDEN,
            ApiError::NotFound(..) => StatusCode::NOT_FOUND,
            ApiError::Conflict(..) => StatusCode::CONFLICT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadRequest(code, _)
            | ApiError::Unauthorized(code, _)
            | ApiError::Forbidden(code, _)
            | ApiError::NotFound(code, _)
            | ApiError::Conflict(code, _) => code,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest("INVALID_JSON", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            ApiError::BadRequest(_, message)
            | ApiError::Unauthorized(_, message)
            | ApiError::Forbidden(_, message)
            | ApiError::NotFound(_, message)
            | ApiError::Conflict(_, message) => message,
        };

        (
            status,
            Json(ApiErrorBody {
                error: ApiErrorData { code, message },
            }),
        )
            .into_response()
    }
}

fn name_error_code(err: &NameError) -> &'static str {
    match err {
        NameError::Required => "NAME_REQUIRED",
        NameError::TooShort { .. } => "NAME_TOO_SHORT",
        NameError::TooLong { .. } => "NAME_TOO_LONG",
        NameError::InvalidCharacters => "INVALID_NAME_CHARACTERS",
    }
}

fn email_error_code(err: &EmailError) -> &'static str {
    match err {
        EmailError::Required => "EMAIL_REQUIRED",
        EmailError::InvalidFormat(_) => "INVALID_EMAIL_FORMAT",
    }
}

fn password_error_code(err: &PasswordPolicyError) -> &'static str {
    match err {
        PasswordPolicyError::Required => "PASSWORD_REQUIRED",
        PasswordPolicyError::TooShort { .. } => "PASSWORD_TOO_SHORT",
        PasswordPolicyError::TooLong { .. } => "PASSWORD_TOO_LONG",
        PasswordPolicyError::Weak => "PASSWORD_WEAK",
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::InvalidUserId(_) => ApiError::BadRequest("INVALID_ID", message),
            UserError::InvalidName(ref e) => ApiError::BadRequest(name_error_code(e), message),
            UserError::InvalidEmail(ref e) => ApiError::BadRequest(email_error_code(e), message),
            UserError::InvalidPassword(ref e) => {
                ApiError::BadRequest(password_error_code(e), message)
            }
            UserError::RoleRequired => ApiError::BadRequest("ROLE_REQUIRED", message),
            UserError::UnknownRole(_) => ApiError::BadRequest("ROLE_NOT_FOUND", message),
            UserError::AlreadyDeleted(_) => ApiError::BadRequest("USER_ALREADY_DELETED", message),
            UserError::NotDeleted(_) => ApiError::BadRequest("USER_NOT_DELETED", message),
            UserError::NotFound(_) => ApiError::NotFound("NOT_FOUND", message),
            UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("EMAIL_ALREADY_EXISTS", message)
            }
            UserError::EmailSoftDeleted(_) => ApiError::Conflict("EMAIL_SOFT_DELETED", message),
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("INVALID_CREDENTIALS", message)
            }
            UserError::Inactive => ApiError::Unauthorized("USER_INACTIVE", message),
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(message)
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::InvalidCredentials => {
                ApiError::Unauthorized("INVALID_CREDENTIALS", message)
            }
            SessionError::UserInactive => ApiError::Unauthorized("USER_INACTIVE", message),
            SessionError::InvalidRefreshToken => {
                ApiError::Unauthorized("INVALID_REFRESH_TOKEN", message)
            }
            SessionError::ExpiredRefreshToken => {
                ApiError::Unauthorized("EXPIRED_REFRESH_TOKEN", message)
            }
            SessionError::TokenConflict => ApiError::Conflict("CONFLICT", message),
            SessionError::TokenIssuance(_)
            | SessionError::DatabaseError(_)
            | SessionError::Unknown(_) => ApiError::InternalServerError(message),
        }
    }
}

impl From<RoleError> for ApiError {
    fn from(err: RoleError) -> Self {
        let message = err.to_string();
        match err {
            RoleError::InvalidRoleId(_) => ApiError::BadRequest("INVALID_ID", message),
            RoleError::InvalidName(RoleNameError::Required) => {
                ApiError::BadRequest("ROLE_NAME_REQUIRED", message)
            }
            RoleError::InvalidName(RoleNameError::TooLong { .. }) => {
                ApiError::BadRequest("ROLE_NAME_TOO_LONG", message)
            }
            RoleError::NotFound(_) | RoleError::NotFoundByName(_) => {
                ApiError::NotFound("ROLE_NOT_FOUND", message)
            }
            RoleError::NameAlreadyExists(_) => {
                ApiError::Conflict("ROLE_NAME_ALREADY_EXISTS", message)
            }
            RoleError::SystemRoleImmutable(_) => {
                ApiError::BadRequest("SYSTEM_ROLE_NOT_DELETABLE", message)
            }
            RoleError::AlreadyDeleted(_) => ApiError::BadRequest("ROLE_ALREADY_DELETED", message),
            RoleError::NotDeleted(_) => ApiError::BadRequest("ROLE_NOT_DELETED", message),
            RoleError::InUse(_) => ApiError::Conflict("ROLE_IN_USE", message),
            RoleError::DatabaseError(_) => ApiError::InternalServerError(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}

impl MessageResponseData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = render(ApiError::from(UserError::EmailSoftDeleted(
            "ana@example.com".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "EMAIL_SOFT_DELETED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("ana@example.com"));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = render(ApiError::from(UserError::DatabaseError(
            "connection refused on 10.0.0.4".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["error"]["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_codes() {
        assert_eq!(
            ApiError::from(UserError::from(PasswordPolicyError::Weak)).code(),
            "PASSWORD_WEAK"
        );
        assert_eq!(
            ApiError::from(UserError::from(NameError::InvalidCharacters)).code(),
            "INVALID_NAME_CHARACTERS"
        );
        assert_eq!(
            ApiError::from(UserError::from(EmailError::Required)).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_session_codes() {
        assert_eq!(
            ApiError::from(SessionError::ExpiredRefreshToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SessionError::InvalidCredentials).code(),
            ApiError::from(UserError::InvalidCredentials).code()
        );
    }

    #[test]
    fn test_system_role_errors_are_bad_requests() {
        let error = ApiError::from(RoleError::SystemRoleImmutable("admin".to_string()));

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "SYSTEM_ROLE_NOT_DELETABLE");
    }
}
