use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::role::models::UpdateRoleCommand;
use crate::inbound::http::router::AppState;
use crate::role::errors::RoleError;

fn parse_role_id(raw: &str) -> Result<RoleId, ApiError> {
    RoleId::from_string(raw)
        .map_err(RoleError::from)
        .map_err(ApiError::from)
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListRolesQuery {
    #[serde(default)]
    include_deleted: bool,
}

pub async fn list_roles(
    State(state): State<AppState>,
    Query(query): Query<ListRolesQuery>,
) -> Result<ApiSuccess<Vec<RoleResponseData>>, ApiError> {
    state
        .role_service
        .list_roles(query.include_deleted)
        .await
        .map_err(ApiError::from)
        .map(|roles| ApiSuccess::new(StatusCode::OK, roles.iter().map(Into::into).collect()))
}

pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<ApiSuccess<RoleResponseData>, ApiError> {
    let role_id = parse_role_id(&role_id)?;

    state
        .role_service
        .get_role(&role_id)
        .await
        .map_err(ApiError::from)
        .map(|ref role| ApiSuccess::new(StatusCode::OK, role.into()))
}

pub async fn create_role(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateRoleRequest>,
) -> Result<ApiSuccess<RoleResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .role_service
        .create_role(command)
        .await
        .map_err(ApiError::from)
        .map(|ref role| ApiSuccess::new(StatusCode::CREATED, role.into()))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    ApiJson(body): ApiJson<UpdateRoleRequest>,
) -> Result<ApiSuccess<RoleResponseData>, ApiError> {
    let role_id = parse_role_id(&role_id)?;
    let command = body.try_into_command()?;

    state
        .role_service
        .update_role(&role_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref role| ApiSuccess::new(StatusCode::OK, role.into()))
}

pub async fn soft_delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let role_id = parse_role_id(&role_id)?;

    state
        .role_service
        .soft_delete_role(&role_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData::new("Role deleted successfully"),
    ))
}

pub async fn restore_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<ApiSuccess<RoleResponseData>, ApiError> {
    let role_id = parse_role_id(&role_id)?;

    state
        .role_service
        .restore_role(&role_id)
        .await
        .map_err(ApiError::from)
        .map(|ref role| ApiSuccess::new(StatusCode::OK, role.into()))
}

pub async fn hard_delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let role_id = parse_role_id(&role_id)?;

    state
        .role_service
        .hard_delete_role(&role_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData::new("Role permanently deleted"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRoleRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: i32,
}

impl CreateRoleRequest {
    fn try_into_command(self) -> Result<CreateRoleCommand, RoleError> {
        Ok(CreateRoleCommand {
            name: RoleName::new(self.name)?,
            description: self.description,
            priority: self.priority,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateRoleRequest {
    name: Option<String>,
    description: Option<String>,
    priority: Option<i32>,
    is_active: Option<bool>,
}

impl UpdateRoleRequest {
    fn try_into_command(self) -> Result<UpdateRoleCommand, RoleError> {
        Ok(UpdateRoleCommand {
            name: self.name.map(RoleName::new).transpose()?,
            description: self.description,
            priority: self.priority,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleResponseData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_system: bool,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Role> for RoleResponseData {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.0,
            name: role.name.as_str().to_string(),
            description: role.description.clone(),
            is_active: role.is_active,
            is_system: role.is_system,
            priority: role.priority,
            created_at: role.created_at,
            updated_at: role.updated_at,
            deleted_at: role.deletion.deleted_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_role_name_rejected() {
        let body = CreateRoleRequest {
            name: "   ".to_string(),
            description: String::new(),
            priority: 0,
        };

        let error = ApiError::from(body.try_into_command().unwrap_err());
        assert_eq!(error.code(), "ROLE_NAME_REQUIRED");
    }

    #[test]
    fn test_role_id_must_be_positive() {
        assert_eq!(parse_role_id("-4").unwrap_err().code(), "INVALID_ID");
        assert_eq!(parse_role_id("7").unwrap(), RoleId(7));
    }
}
