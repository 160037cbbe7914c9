use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::deletion::DeletionState;
use crate::role::errors::RoleError;
use crate::role::errors::RoleIdError;
use crate::role::errors::RoleNameError;

pub const ADMIN_ROLE: &str = "admin";
pub const DEV_ROLE: &str = "dev";
pub const USER_ROLE: &str = "user";

/// Roles allowed to run destructive user and role management operations.
pub const MANAGEMENT_ROLES: &[&str] = &[ADMIN_ROLE, DEV_ROLE];

/// System roles seeded at startup, with their priority.
pub const SYSTEM_ROLES: &[(&str, &str, i32)] = &[
    (ADMIN_ROLE, "Full administrative access", 1),
    (DEV_ROLE, "Developer access", 2),
    (USER_ROLE, "Regular gym member", 3),
];

/// Role aggregate entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub description: String,
    pub is_active: bool,
    pub is_system: bool,
    pub priority: i32,
    pub deletion: DeletionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_deleted(&self) -> bool {
        self.deletion.is_deleted()
    }

    /// Move the role into the soft-deleted state.
    ///
    /// # Errors
    /// * `SystemRoleImmutable` - Role is a system role
    /// * `AlreadyDeleted` - Role is already soft-deleted
    pub fn soft_delete(&mut self, at: DateTime<Utc>) -> Result<(), RoleError> {
        self.ensure_not_system()?;
        if self.is_deleted() {
            return Err(RoleError::AlreadyDeleted(self.id.to_string()));
        }
        self.deletion = DeletionState::SoftDeleted { at };
        self.is_active = false;
        self.updated_at = at;
        Ok(())
    }

    /// Bring a soft-deleted role back.
    ///
    /// # Errors
    /// * `NotDeleted` - Role is not soft-deleted
    pub fn restore(&mut self, at: DateTime<Utc>) -> Result<(), RoleError> {
        if !self.is_deleted() {
            return Err(RoleError::NotDeleted(self.id.to_string()));
        }
        self.deletion = DeletionState::Active;
        self.is_active = true;
        self.updated_at = at;
        Ok(())
    }

    pub fn ensure_not_system(&self) -> Result<(), RoleError> {
        if self.is_system {
            Err(RoleError::SystemRoleImmutable(self.name.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Role unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub i64);

impl RoleId {
    /// Parse a role ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, RoleIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(RoleIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role name value type, trimmed and at most 50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleName(String);

impl RoleName {
    const MAX_LENGTH: usize = 50;

    pub fn new(name: String) -> Result<Self, RoleNameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length == 0 {
            Err(RoleNameError::Required)
        } else if length > Self::MAX_LENGTH {
            Err(RoleNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role fields known before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: RoleName,
    pub description: String,
    pub is_system: bool,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

/// Command to create a new role with domain types
#[derive(Debug)]
pub struct CreateRoleCommand {
    pub name: RoleName,
    pub description: String,
    pub priority: i32,
}

/// Command to update an existing role. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateRoleCommand {
    pub name: Option<RoleName>,
    pub description: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}
