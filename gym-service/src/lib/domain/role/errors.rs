use thiserror::Error;

/// Error for RoleId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleIdError {
    #[error("Invalid role id: {0}")]
    InvalidFormat(String),
}

/// Error for RoleName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleNameError {
    #[error("Role name is required")]
    Required,

    #[error("Role name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all role-related operations
#[derive(Debug, Clone, Error)]
pub enum RoleError {
    #[error("Invalid role ID: {0}")]
    InvalidRoleId(#[from] RoleIdError),

    #[error("Invalid role name: {0}")]
    InvalidName(#[from] RoleNameError),

    #[error("Role not found: {0}")]
    NotFound(String),

    #[error("Role not found with name: {0}")]
    NotFoundByName(String),

    #[error("Role name already exists: {0}")]
    NameAlreadyExists(String),

    #[error("System role cannot be deleted or renamed: {0}")]
    SystemRoleImmutable(String),

    #[error("Role is already deleted: {0}")]
    AlreadyDeleted(String),

    #[error("Role is not deleted: {0}")]
    NotDeleted(String),

    #[error("Role is still assigned to users: {0}")]
    InUse(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
