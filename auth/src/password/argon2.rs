use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Argon2id password hasher producing PHC strings.
///
/// Verification reads the cost parameters from the stored hash, so hashes produced with
/// different costs stay verifiable after the defaults change.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Hasher with the Argon2id defaults recommended by OWASP.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hasher with an explicit memory cost (KiB) and iteration count.
    ///
    /// # Errors
    /// * `InvalidParameters` - Costs are outside what Argon2 accepts
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash in constant time.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Stored value is not a PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1024, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("Valid123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Valid123", &hash).unwrap());
        assert!(!hasher.verify("Valid124", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = cheap_hasher();

        assert_ne!(
            hasher.hash("Valid123").unwrap(),
            hasher.hash("Valid123").unwrap()
        );
    }

    #[test]
    fn test_verify_uses_cost_from_hash() {
        let hash = cheap_hasher().hash("Valid123").unwrap();

        assert!(PasswordHasher::new().verify("Valid123", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let result = cheap_hasher().verify("password", "plaintext-password");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        assert!(matches!(
            PasswordHasher::with_cost(1024, 0),
            Err(PasswordError::InvalidParameters(_))
        ));
    }
}
