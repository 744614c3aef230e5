//! Driving port for profile edits and account removal.

use async_trait::async_trait;

use crate::domain::{Error, Requester, User, UserId, UserPatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Apply a profile patch; self-service or administrator.
    async fn update_user(
        &self,
        requester: &Requester,
        id: UserId,
        patch: UserPatch,
    ) -> Result<User, Error>;

    /// Remove an account; administrators only.
    async fn delete_user(&self, requester: &Requester, id: UserId) -> Result<(), Error>;
}
