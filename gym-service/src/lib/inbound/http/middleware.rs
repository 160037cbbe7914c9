use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::role::models::RoleId;
use crate::domain::role::ports::RoleServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity attached to request extensions by [`authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role_id: RoleId,
}

/// Middleware that validates the Bearer access token and adds the caller's identity to
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = bearer_token(req.headers())?;
        state.token_codec.verify_access_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            ApiError::Unauthorized("INVALID_TOKEN", "Invalid or expired token".to_string())
        })?
    };

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Access token subject is not a user id");
        ApiError::Unauthorized("INVALID_TOKEN", "Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(user_id),
        email: claims.email,
        role_id: RoleId(claims.role_id),
    });

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header must split on a single space into exactly two parts.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        ApiError::Unauthorized(
            "UNAUTHORIZED",
            "Authorization header is required".to_string(),
        )
    })?;

    let invalid_format = || {
        ApiError::Unauthorized(
            "INVALID_AUTH_FORMAT",
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    };

    let value = value.to_str().map_err(|_| invalid_format())?;
    let parts: Vec<&str> = value.split(' ').collect();

    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token),
        _ => Err(invalid_format()),
    }
}

/// Allow-list of role names for a group of routes.
#[derive(Clone)]
pub struct RoleGate {
    roles: Arc<dyn RoleServicePort>,
    allowed: &'static [&'static str],
}

impl RoleGate {
    pub fn new(roles: Arc<dyn RoleServicePort>, allowed: &'static [&'static str]) -> Self {
        Self { roles, allowed }
    }

    pub fn permits(&self, role_name: &str) -> bool {
        self.allowed.contains(&role_name)
    }

    /// Resolve the caller's role and check it against the allow-list.
    ///
    /// Any failure to resolve the role is reported as invalid role information.
    pub async fn authorize(&self, identity: &AuthenticatedUser) -> Result<(), ApiError> {
        let role = self.roles.get_role(&identity.role_id).await.map_err(|e| {
            tracing::warn!(
                user_id = %identity.user_id,
                role_id = %identity.role_id,
                error = %e,
                "Caller role could not be resolved"
            );
            ApiError::Forbidden("INVALID_ROLE_INFO", "Role information is invalid".to_string())
        })?;

        if !self.permits(role.name.as_str()) {
            tracing::info!(
                user_id = %identity.user_id,
                role = %role.name,
                "Insufficient permissions"
            );
            return Err(ApiError::Forbidden(
                "INSUFFICIENT_PERMISSIONS",
                "Insufficient permissions for this operation".to_string(),
            ));
        }

        Ok(())
    }
}

/// Middleware that resolves the caller's role and rejects roles outside the gate.
///
/// Must run after [`authenticate`].
pub async fn require_roles(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req.extensions().get::<AuthenticatedUser>().cloned();
    let Some(identity) = identity else {
        return Err(ApiError::Forbidden(
            "ROLE_INFO_UNAVAILABLE",
            "Role information is not available".to_string(),
        ));
    };

    gate.authorize(&identity).await?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use axum::http::StatusCode;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::deletion::DeletionState;
    use crate::domain::role::models::CreateRoleCommand;
    use crate::domain::role::models::Role;
    use crate::domain::role::models::RoleName;
    use crate::domain::role::models::UpdateRoleCommand;
    use crate::domain::role::models::MANAGEMENT_ROLES;
    use crate::role::errors::RoleError;

    mock! {
        pub TestRoleService {}

        #[async_trait]
        impl RoleServicePort for TestRoleService {
            async fn create_role(&self, command: CreateRoleCommand) -> Result<Role, RoleError>;
            async fn get_role(&self, id: &RoleId) -> Result<Role, RoleError>;
            async fn get_role_by_name(&self, name: &str) -> Result<Role, RoleError>;
            async fn list_roles(&self, include_deleted: bool) -> Result<Vec<Role>, RoleError>;
            async fn update_role(&self, id: &RoleId, command: UpdateRoleCommand) -> Result<Role, RoleError>;
            async fn soft_delete_role(&self, id: &RoleId) -> Result<(), RoleError>;
            async fn restore_role(&self, id: &RoleId) -> Result<Role, RoleError>;
            async fn hard_delete_role(&self, id: &RoleId) -> Result<(), RoleError>;
        }
    }

    fn role(id: i64, name: &str) -> Role {
        Role {
            id: RoleId(id),
            name: RoleName::new(name.to_string()).unwrap(),
            description: String::new(),
            is_active: true,
            is_system: true,
            priority: 1,
            deletion: DeletionState::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn caller(role_id: i64) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId(1),
            email: "caller@example.com".to_string(),
            role_id: RoleId(role_id),
        }
    }

    fn gate(roles: MockTestRoleService) -> RoleGate {
        RoleGate::new(Arc::new(roles), MANAGEMENT_ROLES)
    }

    fn headers_with(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static(authorization),
        );
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Ok("abc.def"));
    }

    #[test]
    fn test_missing_header() {
        let error = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(error.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_malformed_headers() {
        for value in ["abc.def", "Basic abc.def", "Bearer", "Bearer ", "Bearer a b", "bearer abc"] {
            let error = bearer_token(&headers_with(value)).unwrap_err();
            assert_eq!(error.code(), "INVALID_AUTH_FORMAT", "header {:?}", value);
        }
    }

    #[tokio::test]
    async fn test_gate_admits_management_role() {
        let mut roles = MockTestRoleService::new();
        roles
            .expect_get_role()
            .returning(|id| Ok(role(id.0, "admin")));

        assert!(gate(roles).authorize(&caller(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_gate_rejects_other_roles() {
        let mut roles = MockTestRoleService::new();
        roles
            .expect_get_role()
            .returning(|id| Ok(role(id.0, "user")));

        let error = gate(roles).authorize(&caller(3)).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::FORBIDDEN);
        assert_eq!(error.code(), "INSUFFICIENT_PERMISSIONS");
    }

    #[tokio::test]
    async fn test_gate_treats_store_failure_as_invalid_role() {
        let mut roles = MockTestRoleService::new();
        roles
            .expect_get_role()
            .returning(|_| Err(RoleError::DatabaseError("connection reset".to_string())));

        let error = gate(roles).authorize(&caller(1)).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::FORBIDDEN);
        assert_eq!(error.code(), "INVALID_ROLE_INFO");
    }

    #[tokio::test]
    async fn test_gate_treats_missing_role_as_invalid_role() {
        let mut roles = MockTestRoleService::new();
        roles
            .expect_get_role()
            .returning(|id| Err(RoleError::NotFound(id.to_string())));

        let error = gate(roles).authorize(&caller(9)).await.unwrap_err();
        assert_eq!(error.code(), "INVALID_ROLE_INFO");
    }
}
