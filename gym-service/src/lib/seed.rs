use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::config::SeedAccount;
use crate::config::SeedConfig;
use crate::domain::role::models::NewRole;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::role::models::ADMIN_ROLE;
use crate::domain::role::models::DEV_ROLE;
use crate::domain::role::models::SYSTEM_ROLES;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::role::errors::RoleError;
use crate::role::ports::RoleRepository;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to seed roles: {0}")]
    Role(#[from] RoleError),

    #[error("Failed to seed account {email}: {source}")]
    Account { email: String, source: UserError },
}

/// Idempotent startup seeding of system roles and bootstrap accounts.
pub struct Seeder<RR, US>
where
    RR: RoleRepository,
    US: UserServicePort,
{
    roles: Arc<RR>,
    users: Arc<US>,
}

impl<RR, US> Seeder<RR, US>
where
    RR: RoleRepository,
    US: UserServicePort,
{
    pub fn new(roles: Arc<RR>, users: Arc<US>) -> Self {
        Self { roles, users }
    }

    pub async fn run(&self, config: &SeedConfig) -> Result<(), SeedError> {
        self.ensure_system_roles().await?;

        if let Some(account) = &config.admin {
            self.ensure_account(account, ADMIN_ROLE).await?;
        }
        if let Some(account) = &config.dev {
            self.ensure_account(account, DEV_ROLE).await?;
        }

        Ok(())
    }

    async fn ensure_system_roles(&self) -> Result<(), SeedError> {
        for (name, description, priority) in SYSTEM_ROLES {
            if self.roles.find_by_name(name).await?.is_some() {
                continue;
            }

            let role = self
                .roles
                .create(NewRole {
                    name: RoleName::new(name.to_string()).map_err(RoleError::from)?,
                    description: description.to_string(),
                    is_system: true,
                    priority: *priority,
                    created_at: Utc::now(),
                })
                .await?;

            tracing::info!(role_id = %role.id, role_name = %role.name, "System role created");
        }

        Ok(())
    }

    async fn role_id(&self, name: &str) -> Result<RoleId, SeedError> {
        self.roles
            .find_by_name(name)
            .await?
            .map(|role| role.id)
            .ok_or_else(|| RoleError::NotFoundByName(name.to_string()).into())
    }

    async fn ensure_account(&self, account: &SeedAccount, role: &str) -> Result<(), SeedError> {
        let failed = |source: UserError| SeedError::Account {
            email: account.email.clone(),
            source,
        };

        let command = CreateUserCommand::new(
            DisplayName::new(account.name.clone()).map_err(|e| failed(e.into()))?,
            EmailAddress::new(account.email.clone()).map_err(|e| failed(e.into()))?,
            Password::new(account.password.clone()).map_err(|e| failed(e.into()))?,
            self.role_id(role).await?,
        );

        match self.users.create_user(command).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role, "Bootstrap account created");
                Ok(())
            }
            Err(UserError::EmailAlreadyExists(_)) | Err(UserError::EmailSoftDeleted(_)) => {
                tracing::debug!(role, "Bootstrap account already present");
                Ok(())
            }
            Err(e) => Err(failed(e)),
        }
    }
}
