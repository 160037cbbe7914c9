use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::NewRole;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::UpdateRoleCommand;
use crate::role::errors::RoleError;
use crate::role::ports::RoleRepository;
use crate::role::ports::RoleServicePort;

/// Domain service implementation for role operations.
pub struct RoleService<RR>
where
    RR: RoleRepository,
{
    repository: Arc<RR>,
}

impl<RR> RoleService<RR>
where
    RR: RoleRepository,
{
    pub fn new(repository: Arc<RR>) -> Self {
        Self { repository }
    }

    async fn find_any(&self, id: &RoleId) -> Result<Role, RoleError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(RoleError::NotFound(id.to_string()))
    }

    async fn find_live(&self, id: &RoleId) -> Result<Role, RoleError> {
        let role = self.find_any(id).await?;
        if role.is_deleted() {
            return Err(RoleError::NotFound(id.to_string()));
        }
        Ok(role)
    }
}

#[async_trait]
impl<RR> RoleServicePort for RoleService<RR>
where
    RR: RoleRepository,
{
    async fn create_role(&self, command: CreateRoleCommand) -> Result<Role, RoleError> {
        if self
            .repository
            .find_by_name(command.name.as_str())
            .await?
            .is_some()
        {
            return Err(RoleError::NameAlreadyExists(command.name.to_string()));
        }

        let role = self
            .repository
            .create(NewRole {
                name: command.name,
                description: command.description,
                is_system: false,
                priority: command.priority,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(role_id = %role.id, role_name = %role.name, "Role created");
        Ok(role)
    }

    async fn get_role(&self, id: &RoleId) -> Result<Role, RoleError> {
        self.find_live(id).await
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Role, RoleError> {
        self.repository
            .find_by_name(name)
            .await?
            .filter(|role| !role.is_deleted())
            .ok_or(RoleError::NotFoundByName(name.to_string()))
    }

    async fn list_roles(&self, include_deleted: bool) -> Result<Vec<Role>, RoleError> {
        self.repository.list(include_deleted).await
    }

    async fn update_role(
        &self,
        id: &RoleId,
        command: UpdateRoleCommand,
    ) -> Result<Role, RoleError> {
        let mut role = self.find_live(id).await?;

        if let Some(new_name) = command.name {
            if new_name != role.name {
                role.ensure_not_system()?;

                let taken = self.repository.find_by_name(new_name.as_str()).await?;
                if taken.is_some_and(|other| other.id != role.id) {
                    return Err(RoleError::NameAlreadyExists(new_name.to_string()));
                }
                role.name = new_name;
            }
        }

        if let Some(description) = command.description {
            role.description = description;
        }

        if let Some(priority) = command.priority {
            role.priority = priority;
        }

        if let Some(is_active) = command.is_active {
            role.is_active = is_active;
        }

        role.updated_at = Utc::now();
        self.repository.update(role).await
    }

    async fn soft_delete_role(&self, id: &RoleId) -> Result<(), RoleError> {
        let mut role = self.find_any(id).await?;
        role.soft_delete(Utc::now())?;
        self.repository.update(role).await?;

        tracing::info!(role_id = %id, "Role soft-deleted");
        Ok(())
    }

    async fn restore_role(&self, id: &RoleId) -> Result<Role, RoleError> {
        let mut role = self.find_any(id).await?;
        role.restore(Utc::now())?;
        let role = self.repository.update(role).await?;

        tracing::info!(role_id = %id, "Role restored");
        Ok(role)
    }

    async fn hard_delete_role(&self, id: &RoleId) -> Result<(), RoleError> {
        let role = self.find_any(id).await?;
        role.ensure_not_system()?;
        self.repository.delete(id).await?;

        tracing::warn!(role_id = %id, role_name = %role.name, "Role permanently deleted");
        Ok(())
    }
}
