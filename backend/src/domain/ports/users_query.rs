//! Driving port for user reads.
//!
//! Handlers call this port with the authenticated [`Requester`]; the
//! implementation decides which records are visible.

use async_trait::async_trait;

use crate::domain::{Error, Requester, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user; administrators only.
    async fn list_users(&self, requester: &Requester) -> Result<Vec<User>, Error>;

    /// One user, visible to administrators and to the user themselves.
    async fn get_user(&self, requester: &Requester, id: UserId) -> Result<User, Error>;
}
