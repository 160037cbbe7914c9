//! Authentication primitives for the gym service.
//!
//! - Password hashing (Argon2id) and password strength policy
//! - Access and refresh JWTs (HS256)
//! - Refresh token digests (SHA-256) for storage
//!
//! The service owns its domain rules; this crate only knows about strings, ids and
//! durations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Valid123").unwrap();
//! assert!(hasher.verify("Valid123", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//!
//! let access = codec.issue_access_token(1, "ana@example.com", 3, Duration::minutes(60)).unwrap();
//! let claims = codec.verify_access_token(&access).unwrap();
//! assert_eq!(claims.role_id, 3);
//!
//! let refresh = codec.issue_refresh_token(1, Duration::hours(168)).unwrap();
//! let stored = codec.digest(&refresh);
//! assert_eq!(stored.len(), 64);
//! ```

pub mod codec;
pub mod digest;
pub mod jwt;
pub mod password;

pub use codec::TokenCodec;
pub use digest::hash_token;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use password::PasswordPolicyError;
