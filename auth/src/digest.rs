use sha2::Digest;
use sha2::Sha256;

/// One-way digest of a token string, as lowercase hex SHA-256.
///
/// Refresh tokens are stored and looked up by this value only.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
