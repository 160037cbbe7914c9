use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::inbound::http::cookies::RefreshCookie;
use crate::inbound::http::router::AppState;

/// Revoke the presented refresh token and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<([(HeaderName, String); 1], ApiSuccess<MessageResponseData>), ApiError> {
    let refresh_token = RefreshCookie::extract(&headers).ok_or_else(|| {
        ApiError::BadRequest("NO_ACTIVE_SESSION", "No active session".to_string())
    })?;

    state.session_service.logout(&refresh_token).await;

    Ok((
        [(header::SET_COOKIE, state.refresh_cookie.clear())],
        ApiSuccess::new(
            StatusCode::OK,
            MessageResponseData::new("Session closed successfully"),
        ),
    ))
}
