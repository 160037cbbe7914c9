#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;
use gym_service::config::SeedAccount;
use gym_service::config::SeedConfig;
use gym_service::domain::deletion::DeletionState;
use gym_service::domain::role::errors::RoleError;
use gym_service::domain::role::models::NewRole;
use gym_service::domain::role::models::Role;
use gym_service::domain::role::models::RoleId;
use gym_service::domain::role::ports::RoleRepository;
use gym_service::domain::role::service::RoleService;
use gym_service::domain::session::errors::SessionError;
use gym_service::domain::session::models::NewRefreshToken;
use gym_service::domain::session::models::RefreshTokenRecord;
use gym_service::domain::session::models::SessionPolicy;
use gym_service::domain::session::models::TokenHash;
use gym_service::domain::session::ports::RefreshTokenRepository;
use gym_service::domain::session::service::SessionService;
use gym_service::domain::user::errors::UserError;
use gym_service::domain::user::models::EmailAddress;
use gym_service::domain::user::models::NewUser;
use gym_service::domain::user::models::User;
use gym_service::domain::user::models::UserId;
use gym_service::domain::user::ports::UserRepository;
use gym_service::domain::user::service::UserService;
use gym_service::inbound::http::cookies::RefreshCookie;
use gym_service::inbound::http::router::create_router;
use gym_service::inbound::http::router::AppState;
use gym_service::seed::Seeder;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@gym.example.com";
pub const ADMIN_PASSWORD: &str = "AdminPass123";
pub const USER_ROLE_ID: i64 = 3;

/// Test application that spawns the real router over in-memory stores.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub codec: TokenCodec,
    pub users: Arc<InMemoryUserRepository>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let roles = Arc::new(InMemoryRoleRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());

        let codec = TokenCodec::new(JWT_SECRET);
        let hasher = PasswordHasher::with_cost(1024, 1).expect("Failed to build hasher");

        let user_service = Arc::new(UserService::with_password_hasher(
            Arc::clone(&users),
            hasher,
        ));
        let role_service = Arc::new(RoleService::new(Arc::clone(&roles)));
        let session_service = Arc::new(SessionService::new(
            Arc::clone(&user_service),
            Arc::clone(&refresh_tokens),
            codec.clone(),
            SessionPolicy {
                access_ttl: Duration::minutes(60),
                refresh_ttl: Duration::hours(168),
            },
        ));

        let seed = SeedConfig {
            admin: Some(SeedAccount {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                name: "Administrator".to_string(),
            }),
            dev: None,
        };
        Seeder::new(roles, Arc::clone(&user_service))
            .run(&seed)
            .await
            .expect("Failed to seed");

        let router = create_router(AppState {
            user_service,
            role_service,
            session_service,
            token_codec: Arc::new(codec.clone()),
            refresh_cookie: RefreshCookie::new(168 * 3600),
        });

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            codec,
            users,
            refresh_tokens,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// The refresh cookie is `Secure`, so it is sent by hand over plain http.
    pub fn post_with_refresh_cookie(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path)
            .header(reqwest::header::COOKIE, format!("refresh_token={}", token))
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return `(access_token, refresh_token)`.
    pub async fn login_tokens(&self, email: &str, password: &str) -> (String, String) {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let refresh_token = refresh_cookie(&response).expect("Missing refresh cookie");
        let body: Value = response.json().await.expect("Failed to parse response");
        let access_token = body["access_token"].as_str().unwrap().to_string();
        (access_token, refresh_token)
    }

    pub async fn admin_token(&self) -> String {
        self.login_tokens(ADMIN_EMAIL, ADMIN_PASSWORD).await.0
    }

    /// Create a member through the API and return its id.
    pub async fn create_member(&self, admin_token: &str, email: &str, password: &str) -> i64 {
        let response = self
            .post("/api/v1/users")
            .bearer_auth(admin_token)
            .json(&json!({
                "name": "Gym Member",
                "email": email,
                "password": password,
                "role_id": USER_ROLE_ID,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_i64().unwrap()
    }
}

/// Throwaway Postgres database with migrations applied.
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

impl TestDb {
    /// Create a uniquely named database on the server named by `DATABASE_URL`.
    ///
    /// Returns `None` when `DATABASE_URL` is unset, so database tests are skipped.
    pub async fn new() -> Option<Self> {
        let Ok(admin_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL is not set, skipping database test");
            return None;
        };

        let db_name = format!(
            "test_gym_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            admin_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}

/// Value of the `refresh_token` cookie set by a response, empty when cleared.
pub fn refresh_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let (pair, _) = cookie.split_once(';').unwrap_or((cookie, ""));
            pair.strip_prefix("refresh_token=").map(str::to_string)
        })
}

pub async fn error_code(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse response");
    body["error"]["code"].as_str().unwrap_or_default().to_string()
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|user| predicate(user))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let id = rows.iter().map(|row| row.id.0).max().unwrap_or(0) + 1;
        let created = User {
            id: UserId(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role_id: user.role_id,
            is_active: true,
            deletion: DeletionState::Active,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.find(|user| user.id == *id && !user.is_deleted()))
    }

    async fn find_by_id_including_deleted(
        &self,
        id: &UserId,
    ) -> Result<Option<User>, UserError> {
        Ok(self.find(|user| user.id == *id))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self.find(|user| user.email == *email && !user.is_deleted()))
    }

    async fn find_by_email_including_deleted(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserError> {
        Ok(self.find(|user| user.email == *email))
    }

    async fn list_active(&self) -> Result<Vec<User>, UserError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|user| !user.is_deleted()).cloned().collect())
    }

    async fn list_deleted(&self) -> Result<Vec<User>, UserError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|user| user.is_deleted()).cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|row| row.id != user.id && row.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let row = rows
            .iter_mut()
            .find(|row| row.id == user.id)
            .ok_or_else(|| UserError::NotFound(user.id.to_string()))?;
        *row = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != *id);
        if rows.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRoleRepository {
    rows: Mutex<Vec<Role>>,
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn create(&self, role: NewRole) -> Result<Role, RoleError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.name == role.name) {
            return Err(RoleError::NameAlreadyExists(role.name.to_string()));
        }

        let id = rows.iter().map(|row| row.id.0).max().unwrap_or(0) + 1;
        let created = Role {
            id: RoleId(id),
            name: role.name,
            description: role.description,
            is_active: true,
            is_system: role.is_system,
            priority: role.priority,
            deletion: DeletionState::Active,
            created_at: role.created_at,
            updated_at: role.created_at,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &RoleId) -> Result<Option<Role>, RoleError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|role| role.id == *id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RoleError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|role| role.name.as_str() == name).cloned())
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Role>, RoleError> {
        let rows = self.rows.lock().unwrap();
        let mut roles: Vec<Role> = rows
            .iter()
            .filter(|role| include_deleted || !role.is_deleted())
            .cloned()
            .collect();
        roles.sort_by_key(|role| (role.priority, role.id.0));
        Ok(roles)
    }

    async fn update(&self, role: Role) -> Result<Role, RoleError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == role.id)
            .ok_or_else(|| RoleError::NotFound(role.id.to_string()))?;
        *row = role.clone();
        Ok(role)
    }

    async fn delete(&self, id: &RoleId) -> Result<(), RoleError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != *id);
        if rows.len() == before {
            return Err(RoleError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    rows: Mutex<Vec<RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenRepository {
    /// Non-revoked tokens of a user, expired or not.
    pub fn live_tokens_for(&self, user_id: i64) -> usize {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|row| row.user_id == UserId(user_id) && row.revoked_at.is_none())
            .count()
    }

    /// Move every stored expiry into the past.
    pub fn expire_all(&self) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            row.expires_at = Utc::now() - Duration::minutes(1);
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn save(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.token_hash == token.token_hash) {
            return Err(SessionError::TokenConflict);
        }

        let record = RefreshTokenRecord {
            id: rows.len() as i64 + 1,
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            revoked_at: None,
            created_at: token.created_at,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_hash(
        &self,
        token_hash: &TokenHash,
    ) -> Result<Option<RefreshTokenRecord>, SessionError> {
        let found = {
            let rows = self.rows.lock().unwrap();
            rows.iter()
                .find(|row| row.token_hash == *token_hash && row.revoked_at.is_none())
                .cloned()
        };
        // Give other requests a chance to run between lookup and revocation,
        // as a database round-trip would.
        tokio::task::yield_now().await;
        Ok(found)
    }

    async fn revoke_by_hash(&self, token_hash: &TokenHash) -> Result<u64, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        let mut revoked = 0;
        for row in rows
            .iter_mut()
            .filter(|row| row.token_hash == *token_hash && row.revoked_at.is_none())
        {
            row.revoked_at = Some(Utc::now());
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn revoke_all_by_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        let mut revoked = 0;
        for row in rows
            .iter_mut()
            .filter(|row| row.user_id == *user_id && row.revoked_at.is_none())
        {
            row.revoked_at = Some(Utc::now());
            revoked += 1;
        }
        Ok(revoked)
    }
}
