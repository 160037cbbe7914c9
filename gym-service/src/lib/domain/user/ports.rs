use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user with validated credentials.
    ///
    /// # Arguments
    /// * `command` - Validated name, email, password and role
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email belongs to a live account
    /// * `EmailSoftDeleted` - Email belongs to a soft-deleted account
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve a non-deleted user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// List every non-deleted user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// List soft-deleted users.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_deleted_users(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user with optional fields.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    /// * `command` - Command with optional name, email, password, role and active flag
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    /// * `EmailAlreadyExists` / `EmailSoftDeleted` - New email is reserved
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Soft-delete a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `AlreadyDeleted` - User is already soft-deleted
    async fn soft_delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Restore a soft-deleted user.
    ///
    /// # Returns
    /// Restored user entity
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `NotDeleted` - User is not soft-deleted
    async fn restore_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Physically remove a user, deleted or not.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn hard_delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Check a login attempt against the stored credentials.
    ///
    /// # Returns
    /// The authenticated user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, soft-deleted account or wrong password
    /// * `Inactive` - Account exists but is deactivated
    /// * `Password` - Stored hash is unusable
    async fn authenticate(&self, email: &EmailAddress, password: &str)
        -> Result<User, UserError>;
}

/// Port for user persistence operations.
///
/// Plain lookups only see non-deleted users; the `*_including_deleted` variants see all.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a user and return it with its assigned id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Unique constraint on email violated
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    async fn find_by_id_including_deleted(&self, id: &UserId)
        -> Result<Option<User>, UserError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    async fn find_by_email_including_deleted(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserError>;

    async fn list_active(&self) -> Result<Vec<User>, UserError>;

    async fn list_deleted(&self) -> Result<Vec<User>, UserError>;

    /// Persist every mutable field, deletion state included.
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - No row with this id
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
