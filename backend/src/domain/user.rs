//! User identity model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::password::{PasswordError, PasswordHash};

/// Maximum allowed length of a user name.
pub const USER_NAME_MAX: usize = 255;

/// Validation errors for user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::NameTooLong { max } => write!(f, "user name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw numeric value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Parses the decimal form carried in token subjects.
impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .parse::<i64>()
            .map_err(|_| UserValidationError::InvalidId)?;
        Self::new(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique login name, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

/// Persisted user identity.
///
/// ## Invariants
/// - The password hash is never serialised.
/// - An identity without a hash never passes [`User::check_password`].
///
/// # Examples
/// ```
/// use food_api::domain::{User, UserId, UserName};
///
/// let mut user = User::new(
///     UserId::new(7).expect("positive id"),
///     UserName::new("ada").expect("valid name"),
///     true,
/// );
/// assert!(!user.check_password("hunter22"));
/// user.set_password("hunter22").expect("long enough");
/// assert!(user.check_password("hunter22"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: UserName,
    enabled: bool,
    #[serde(skip)]
    password: Option<PasswordHash>,
}

impl User {
    /// Build a user without a password hash.
    pub fn new(id: UserId, name: UserName, enabled: bool) -> Self {
        Self {
            id,
            name,
            enabled,
            password: None,
        }
    }

    /// Attach a previously stored hash.
    pub fn with_password_hash(mut self, hash: Option<PasswordHash>) -> Self {
        self.password = hash;
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password.as_ref()
    }

    pub fn rename(&mut self, name: UserName) {
        self.name = name;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replace the stored hash. Leaves the user untouched on failure.
    pub fn set_password(&mut self, plaintext: &str) -> Result<(), PasswordError> {
        let hash = PasswordHash::generate(plaintext)?;
        self.password = Some(hash);
        Ok(())
    }

    /// Verify `plaintext` against the stored hash.
    pub fn check_password(&self, plaintext: &str) -> bool {
        self.password
            .as_ref()
            .is_some_and(|hash| hash.verify(plaintext))
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: UserName,
    enabled: bool,
    password: PasswordHash,
}

impl NewUser {
    /// Hash `plaintext` and bundle it with the profile fields.
    pub fn new(name: UserName, enabled: bool, plaintext: &str) -> Result<Self, PasswordError> {
        Ok(Self {
            name,
            enabled,
            password: PasswordHash::generate(plaintext)?,
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password
    }

    /// Combine with the store-assigned id.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.name, self.enabled).with_password_hash(Some(self.password))
    }
}
