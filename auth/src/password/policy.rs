use super::errors::PasswordPolicyError;

/// Strength rules applied to plaintext passwords before they are hashed.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl PasswordPolicy {
    pub const DEFAULT: Self = Self {
        min_length: 8,
        max_length: 128,
    };

    /// Check a candidate password.
    ///
    /// # Errors
    /// * `Required` - Empty password
    /// * `TooShort` / `TooLong` - Length outside the policy bounds
    /// * `Weak` - Missing an uppercase letter, a lowercase letter or a digit
    pub fn check(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.is_empty() {
            return Err(PasswordPolicyError::Required);
        }

        let length = password.chars().count();
        if length < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: self.min_length,
                actual: length,
            });
        }
        if length > self.max_length {
            return Err(PasswordPolicyError::TooLong {
                max: self.max_length,
                actual: length,
            });
        }

        let has_upper = password.chars().any(char::is_uppercase);
        let has_lower = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(|c| c.is_ascii_digit());

        if has_upper && has_lower && has_digit {
            Ok(())
        } else {
            Err(PasswordPolicyError::Weak)
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
