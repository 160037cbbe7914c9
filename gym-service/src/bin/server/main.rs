use std::sync::Arc;

use auth::TokenCodec;
use gym_service::config::Config;
use gym_service::domain::role::service::RoleService;
use gym_service::domain::session::service::SessionService;
use gym_service::domain::user::service::UserService;
use gym_service::inbound::http::cookies::RefreshCookie;
use gym_service::inbound::http::router::create_router;
use gym_service::inbound::http::router::AppState;
use gym_service::outbound::repositories::PostgresRefreshTokenRepository;
use gym_service::outbound::repositories::PostgresRoleRepository;
use gym_service::outbound::repositories::PostgresUserRepository;
use gym_service::seed::Seeder;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MAX_DB_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gym_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "gym-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        db_host = %config.database.host,
        db_port = config.database.port,
        db_name = %config.database.name,
        http_port = config.server.port,
        access_ttl_minutes = config.jwt.expiration_minutes,
        refresh_ttl_hours = config.jwt.refresh_expiration_hours,
        "Configuration loaded"
    );

    if config.jwt.uses_default_secret() {
        tracing::warn!("JWT_SECRET is not set, using the development secret");
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(&config.database.url())
        .await?;
    tracing::info!(
        max_connections = MAX_DB_CONNECTIONS,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let codec = TokenCodec::new(config.jwt.secret.as_bytes());
    let user_service = Arc::new(UserService::new(user_repository));
    let role_service = Arc::new(RoleService::new(Arc::clone(&role_repository)));
    let session_service = Arc::new(SessionService::new(
        Arc::clone(&user_service),
        refresh_token_repository,
        codec.clone(),
        config.jwt.session_policy(),
    ));

    Seeder::new(role_repository, Arc::clone(&user_service))
        .run(&config.seed)
        .await?;
    tracing::info!("Seeding completed");

    let state = AppState {
        user_service,
        role_service,
        session_service,
        token_codec: Arc::new(codec),
        refresh_cookie: RefreshCookie::new(config.jwt.refresh_max_age_seconds()),
    };

    let http_address = format!("0.0.0.0:{}", config.server.port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
