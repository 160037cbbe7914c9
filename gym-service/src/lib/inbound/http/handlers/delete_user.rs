use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::get_user::parse_user_id;
use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::inbound::http::router::AppState;

pub async fn soft_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    state
        .user_service
        .soft_delete_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    // A restored account must not resume sessions opened before the delete.
    if let Err(e) = state.session_service.logout_all(&user_id).await {
        tracing::warn!(user_id = %user_id, error = %e, "Failed to revoke sessions of deleted user");
    }

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData::new("User deleted successfully"),
    ))
}

pub async fn hard_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    state
        .user_service
        .hard_delete_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData::new("User permanently deleted"),
    ))
}
