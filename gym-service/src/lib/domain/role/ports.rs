use async_trait::async_trait;

use crate::domain::role::models::CreateRoleCommand;
use crate::domain::role::models::NewRole;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::UpdateRoleCommand;
use crate::role::errors::RoleError;

/// Port for role domain service operations.
#[async_trait]
pub trait RoleServicePort: Send + Sync + 'static {
    /// Create a new, non-system role.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - A role with this name exists, deleted or not
    /// * `DatabaseError` - Database operation failed
    async fn create_role(&self, command: CreateRoleCommand) -> Result<Role, RoleError>;

    /// Retrieve a non-deleted role.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist or is soft-deleted
    async fn get_role(&self, id: &RoleId) -> Result<Role, RoleError>;

    /// Retrieve a non-deleted role by its unique name.
    ///
    /// # Errors
    /// * `NotFoundByName` - No live role with this name
    async fn get_role_by_name(&self, name: &str) -> Result<Role, RoleError>;

    /// List roles ordered by priority.
    async fn list_roles(&self, include_deleted: bool) -> Result<Vec<Role>, RoleError>;

    /// Update a non-deleted role with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist or is soft-deleted
    /// * `SystemRoleImmutable` - Attempt to rename a system role
    /// * `NameAlreadyExists` - New name is taken by another role
    async fn update_role(&self, id: &RoleId, command: UpdateRoleCommand)
        -> Result<Role, RoleError>;

    /// Soft-delete a role.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `SystemRoleImmutable` - Role is a system role
    /// * `AlreadyDeleted` - Role is already soft-deleted
    async fn soft_delete_role(&self, id: &RoleId) -> Result<(), RoleError>;

    /// Restore a soft-deleted role.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `NotDeleted` - Role is not soft-deleted
    async fn restore_role(&self, id: &RoleId) -> Result<Role, RoleError>;

    /// Physically remove a role.
    ///
    /// # Errors
    /// * `NotFound` - Role does not exist
    /// * `SystemRoleImmutable` - Role is a system role
    async fn hard_delete_role(&self, id: &RoleId) -> Result<(), RoleError>;
}

/// Port for role persistence operations.
///
/// Lookups return roles in any deletion state; filtering is a service concern.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    async fn create(&self, role: NewRole) -> Result<Role, RoleError>;

    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RoleError>;

    async fn list(&self, include_deleted: bool) -> Result<Vec<Role>, RoleError>;

    /// Persist every mutable field, deletion state included.
    async fn update(&self, role: Role) -> Result<Role, RoleError>;

    /// # Errors
    /// * `NotFound` - No row with this id
    async fn delete(&self, id: &RoleId) -> Result<(), RoleError>;
}
