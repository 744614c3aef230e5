//! Authentication primitives: login credentials, registrations and the
//! authenticated requester.
//!
//! Handlers build these from raw strings before calling a driving port, so
//! services only ever see validated input.

use zeroize::Zeroizing;

use crate::domain::{Email, FullName, PhoneNumber, Role, UserId, UserValidationError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length accepted at registration.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// The email is lower-cased but not shape-checked: an address that could
/// never have registered simply fails authentication like any other unknown
/// account.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Lower-cased email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password exactly as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while validating a registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error(transparent)]
    Field(#[from] UserValidationError),
    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
}

/// Sign-up request accepted by the registration use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    full_name: FullName,
    phone: Option<PhoneNumber>,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let email = Email::new(email)?;
        let length = password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(RegistrationValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        let full_name = FullName::new(full_name)?;
        let phone = phone.map(PhoneNumber::new).transpose()?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            full_name,
            phone,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }
}

/// The authenticated caller of a use-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: UserId,
    pub role: Role,
}

impl Requester {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Administrators may act on records they do not own.
    pub const fn is_privileged(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether the requester owns `owner`'s records or is privileged.
    pub fn may_access(&self, owner: &UserId) -> bool {
        self.is_privileged() || &self.user_id == owner
    }
}
