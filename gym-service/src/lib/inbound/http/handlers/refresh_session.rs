use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies::RefreshCookie;
use crate::inbound::http::router::AppState;

/// Exchange the refresh cookie for a new access token and a rotated cookie.
pub async fn refresh_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<([(HeaderName, String); 1], ApiSuccess<RefreshResponseData>), ApiError> {
    let refresh_token = RefreshCookie::extract(&headers).ok_or_else(|| {
        ApiError::BadRequest(
            "REFRESH_TOKEN_COOKIE_NOT_FOUND",
            "Refresh token cookie not found".to_string(),
        )
    })?;

    let tokens = state
        .session_service
        .refresh(&refresh_token)
        .await
        .map_err(ApiError::from)?;

    let cookie = state.refresh_cookie.set(&tokens.refresh_token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiSuccess::new(
            StatusCode::OK,
            RefreshResponseData {
                access_token: tokens.access_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
}
