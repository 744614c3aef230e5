//! User administration and self-service profile edits.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, Requester, User, UserId, UserPatch};

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("email is already registered")
        }
        UserPersistenceError::InUse { .. } => {
            Error::invalid_request("user has bookings and cannot be deleted")
        }
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Service implementing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R: UserRepository> UserService<R> {
    async fn load(&self, id: UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(&id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self, requester: &Requester) -> Result<Vec<User>, Error> {
        if !requester.is_privileged() {
            return Err(Error::forbidden("administrator role required"));
        }
        self.repo.list().await.map_err(map_user_repository_error)
    }

    async fn get_user(&self, requester: &Requester, id: UserId) -> Result<User, Error> {
        if !requester.may_access(&id) {
            return Err(Error::forbidden("cannot read another user's profile"));
        }
        self.load(id).await
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn update_user(
        &self,
        requester: &Requester,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, Error> {
        if !requester.may_access(&id) {
            return Err(Error::forbidden("cannot edit another user's profile"));
        }
        let current = self.load(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = patch.apply(current, self.clock.utc());
        self.repo
            .update(&updated)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %id, "user profile updated");
        Ok(updated)
    }

    async fn delete_user(&self, requester: &Requester, id: UserId) -> Result<(), Error> {
        if !requester.is_privileged() {
            return Err(Error::forbidden("administrator role required"));
        }
        let removed = self
            .repo
            .delete(&id)
            .await
            .map_err(map_user_repository_error)?;
        if !removed {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
