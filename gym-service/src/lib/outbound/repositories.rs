pub mod refresh_token;
pub mod role;
pub mod user;

pub use refresh_token::PostgresRefreshTokenRepository;
pub use role::PostgresRoleRepository;
pub use user::PostgresUserRepository;
