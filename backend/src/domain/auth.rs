//! Login credentials.
//!
//! Inbound adapters validate raw input into [`LoginCredentials`] before
//! calling the login port.

use std::fmt;

use zeroize::Zeroizing;

/// Returned when login payload values are blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// The name is trimmed; the password keeps caller whitespace and is zeroed
/// on drop.
///
/// # Examples
/// ```
/// use food_api::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.name(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    name: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(name: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyName);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            name: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
