use std::fmt;
use std::str::FromStr;

use auth::PasswordPolicy;
use auth::PasswordPolicyError;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::deletion::DeletionState;
use crate::role::models::RoleId;
use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered gym member or staff account. The plaintext password never
/// reaches this type, only its Argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role_id: RoleId,
    pub is_active: bool,
    pub deletion: DeletionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deletion.is_deleted()
    }

    /// Soft-delete the account. Also deactivates it.
    ///
    /// # Errors
    /// * `AlreadyDeleted` - Account is already soft-deleted
    pub fn soft_delete(&mut self, at: DateTime<Utc>) -> Result<(), UserError> {
        if self.is_deleted() {
            return Err(UserError::AlreadyDeleted(self.id.to_string()));
        }
        self.deletion = DeletionState::SoftDeleted { at };
        self.is_active = false;
        self.updated_at = at;
        Ok(())
    }

    /// Restore a soft-deleted account and reactivate it.
    ///
    /// # Errors
    /// * `NotDeleted` - Account is not soft-deleted
    pub fn restore(&mut self, at: DateTime<Utc>) -> Result<(), UserError> {
        if !self.is_deleted() {
            return Err(UserError::NotDeleted(self.id.to_string()));
        }
        self.deletion = DeletionState::Active;
        self.is_active = true;
        self.updated_at = at;
        Ok(())
    }
}

/// User unique identifier type, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - Decimal id, as found in paths and token subjects
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(UserIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Trimmed, 2-100 characters, letters (accented included), spaces, hyphens and
/// apostrophes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `Required` - Empty after trimming
    /// * `TooShort` / `TooLong` - Length outside 2-100 characters
    /// * `InvalidCharacters` - Digits, punctuation or symbols present
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length == 0 {
            return Err(NameError::Required);
        }
        if length < Self::MIN_LENGTH {
            return Err(NameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
        {
            return Err(NameError::InvalidCharacters);
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// RFC 5322 parse plus a dotted domain ending in a label of at least two letters.
/// Stored exactly as given; comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `Required` - Empty input
    /// * `InvalidFormat` - Not `local@domain.tld`
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.is_empty() {
            return Err(EmailError::Required);
        }

        email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        if !Self::has_dotted_domain(&email) {
            return Err(EmailError::InvalidFormat(format!(
                "'{}' has no top-level domain",
                email
            )));
        }

        Ok(Self(email))
    }

    fn has_dotted_domain(email: &str) -> bool {
        let Some((_, domain)) = email.rsplit_once('@') else {
            return false;
        };
        match domain.rsplit_once('.') {
            Some((host, tld)) => {
                !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that passed the strength policy. Only lives until it is hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        PasswordPolicy::DEFAULT.check(&password)?;
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// User fields known before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: Password,
    pub role_id: RoleId,
}

impl CreateUserCommand {
    pub fn new(name: DisplayName, email: EmailAddress, password: Password, role_id: RoleId) -> Self {
        Self {
            name,
            email,
            password,
            role_id,
        }
    }
}

/// Command to update an existing user with optional validated fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub name: Option<DisplayName>,
    pub email: Option<EmailAddress>,
    pub password: Option<Password>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
}
