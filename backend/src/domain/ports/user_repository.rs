//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already owns the e-mail address.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// The user still owns bookings and cannot be removed.
        InUse { message: String } => "user is still referenced: {message}",
    }
}

/// A user together with the stored password hash.
///
/// Only the login flow reads this; every other read goes through [`User`],
/// which carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` when the address is
    /// taken.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Overwrite profile fields of an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a user, returning whether a row existed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch credentials by normalised e-mail address.
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredAccount>, UserPersistenceError>;

    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
