use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::deletion::DeletionState;
use crate::domain::role::models::NewRole;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleName;
use crate::domain::role::ports::RoleRepository;
use crate::role::errors::RoleError;

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: String,
    is_active: bool,
    is_system: bool,
    priority: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<RoleRow> for Role {
    type Error = RoleError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: RoleId(row.id),
            name: RoleName::new(row.name)?,
            description: row.description,
            is_active: row.is_active,
            is_system: row.is_system,
            priority: row.priority,
            deletion: DeletionState::from_deleted_at(row.deleted_at),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_write_error(e: sqlx::Error, name: &RoleName) -> RoleError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            RoleError::NameAlreadyExists(name.to_string())
        }
        _ => RoleError::DatabaseError(e.to_string()),
    }
}

fn database_error(e: sqlx::Error) -> RoleError {
    RoleError::DatabaseError(e.to_string())
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create(&self, role: NewRole) -> Result<Role, RoleError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, description, is_active, is_system, priority, created_at, updated_at)
            VALUES ($1, $2, TRUE, $3, $4, $5, $5)
            RETURNING id, name, description, is_active, is_system, priority, created_at, updated_at, deleted_at
            "#,
        )
        .bind(role.name.as_str())
        .bind(&role.description)
        .bind(role.is_system)
        .bind(role.priority)
        .bind(role.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &role.name))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleError> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_active, is_system, priority, created_at, updated_at, deleted_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Role::try_from)
        .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RoleError> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_active, is_system, priority, created_at, updated_at, deleted_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Role::try_from)
        .transpose()
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Role>, RoleError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, is_active, is_system, priority, created_at, updated_at, deleted_at
            FROM roles
            WHERE $1 OR deleted_at IS NULL
            ORDER BY priority, id
            "#,
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Role::try_from).collect()
    }

    async fn update(&self, role: Role) -> Result<Role, RoleError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET name = $2, description = $3, is_active = $4, priority = $5,
                updated_at = $6, deleted_at = $7
            WHERE id = $1
            RETURNING id, name, description, is_active, is_system, priority, created_at, updated_at, deleted_at
            "#,
        )
        .bind(role.id.0)
        .bind(role.name.as_str())
        .bind(&role.description)
        .bind(role.is_active)
        .bind(role.priority)
        .bind(role.updated_at)
        .bind(role.deletion.deleted_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &role.name))?
        .ok_or(RoleError::NotFound(role.id.to_string()))?;

        row.try_into()
    }

    async fn delete(&self, id: &RoleId) -> Result<(), RoleError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_foreign_key_violation() => {
                    RoleError::InUse(id.to_string())
                }
                _ => RoleError::DatabaseError(e.to_string()),
            })?;

        if result.rows_affected() == 0 {
            return Err(RoleError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
