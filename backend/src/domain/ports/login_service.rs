//! Driving ports for authentication and sign-up.
//!
//! Inbound adapters call these to turn credentials into a [`User`] without
//! touching password hashes or persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown e-mail and wrong password fail with the same
    /// `unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create a `user`-role account.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
