use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordError;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for the user lifecycle.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
    /// Verified against on unknown emails so both failure paths cost one Argon2 run.
    dummy_hash: OnceCell<String>,
}

const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    ///
    /// # Returns
    /// User service hashing with the default Argon2id cost
    pub fn new(repository: Arc<UR>) -> Self {
        Self::with_password_hasher(repository, auth::PasswordHasher::new())
    }

    pub fn with_password_hasher(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Argon2 is CPU-bound, so it runs on the blocking pool.
    async fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, UserError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .map_err(UserError::from)
    }

    async fn load_dummy_hash(&self) -> Result<&str, UserError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await
            .map(String::as_str)
    }

    /// Emails stay reserved by soft-deleted accounts until they are hard-deleted.
    async fn ensure_email_available(&self, email: &EmailAddress) -> Result<(), UserError> {
        match self
            .repository
            .find_by_email_including_deleted(email)
            .await?
        {
            Some(owner) if owner.is_deleted() => {
                Err(UserError::EmailSoftDeleted(email.to_string()))
            }
            Some(_) => Err(UserError::EmailAlreadyExists(email.to_string())),
            None => Ok(()),
        }
    }

    async fn find_including_deleted(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id_including_deleted(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        self.ensure_email_available(&command.email).await?;

        let password_hash = self.hash_password(command.password.expose()).await?;

        let user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                role_id: command.role_id,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, role_id = %user.role_id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_active().await
    }

    async fn list_deleted_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_deleted().await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;

        if let Some(new_email) = command.email {
            if new_email != user.email {
                self.ensure_email_available(&new_email).await?;
                user.email = new_email;
            }
        }

        if let Some(new_name) = command.name {
            user.name = new_name;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(new_password.expose()).await?;
        }

        if let Some(role_id) = command.role_id {
            user.role_id = role_id;
        }

        if let Some(is_active) = command.is_active {
            user.is_active = is_active;
        }

        user.updated_at = Utc::now();
        self.repository.update(user).await
    }

    async fn soft_delete_user(&self, id: &UserId) -> Result<(), UserError> {
        let mut user = self.find_including_deleted(id).await?;
        user.soft_delete(Utc::now())?;
        self.repository.update(user).await?;

        tracing::info!(user_id = %id, "User soft-deleted");
        Ok(())
    }

    async fn restore_user(&self, id: &UserId) -> Result<User, UserError> {
        let mut user = self.find_including_deleted(id).await?;
        user.restore(Utc::now())?;
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %id, "User restored");
        Ok(user)
    }

    async fn hard_delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.find_including_deleted(id).await?;
        self.repository.delete(id).await?;

        tracing::warn!(user_id = %id, "User permanently deleted");
        Ok(())
    }

    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<User, UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            tracing::debug!("Login attempt for unknown email");
            let dummy_hash = self.load_dummy_hash().await?;
            self.verify_password(password, dummy_hash).await?;
            return Err(UserError::InvalidCredentials);
        };

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "Login attempt for inactive user");
            return Err(UserError::Inactive);
        }

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }
}
