use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Revoke every refresh token of the caller.
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<([(HeaderName, String); 1], ApiSuccess<MessageResponseData>), ApiError> {
    state
        .session_service
        .logout_all(&caller.user_id)
        .await
        .map_err(ApiError::from)?;

    Ok((
        [(header::SET_COOKIE, state.refresh_cookie.clear())],
        ApiSuccess::new(
            StatusCode::OK,
            MessageResponseData::new("All sessions closed successfully"),
        ),
    ))
}
