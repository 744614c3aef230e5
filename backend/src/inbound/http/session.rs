//! Session helpers keeping handlers free of cookie plumbing.
//!
//! The cookie carries the caller's user id and role. Both must be present and
//! parse cleanly, otherwise the caller is treated as anonymous.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Requester, Role, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Wrapper exposing the operations handlers need from the session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start an authenticated session for `user`, replacing any previous one.
    pub fn sign_in(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id.to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, user.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the session cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }

    /// The authenticated caller, if any.
    pub fn requester(&self) -> Result<Option<Requester>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        match (UserId::new(&raw_id), raw_role.parse::<Role>()) {
            (Ok(user_id), Ok(role)) => Ok(Some(Requester::new(user_id, role))),
            (id, role) => {
                warn!(
                    id_valid = id.is_ok(),
                    role_valid = role.is_ok(),
                    "ignoring malformed session cookie"
                );
                Ok(None)
            }
        }
    }

    /// Require an authenticated caller or return `401 Unauthorized`.
    pub fn require_requester(&self) -> Result<Requester, Error> {
        self.requester()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
