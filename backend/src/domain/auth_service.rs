//! Sign-up and credential checks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{LoginService, PasswordHashError, PasswordHasher, RegistrationService, UserRepository};
use crate::domain::user_service::map_user_repository_error;
use crate::domain::{Error, LoginCredentials, Registration, Role, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal(err.to_string())
}

/// Service implementing [`LoginService`] and [`RegistrationService`].
#[derive(Clone)]
pub struct AuthService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> AuthService<R, H> {
    pub fn new(users: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

#[async_trait]
impl<R, H> LoginService for AuthService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let account = self
            .users
            .find_account_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(account.user)
    }
}

#[async_trait]
impl<R, H> RegistrationService for AuthService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            email: registration.email().clone(),
            full_name: registration.full_name().clone(),
            phone: registration.phone().cloned(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}
