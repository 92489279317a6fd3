//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The acting user lives inside the signed session cookie. Each request
//! rebuilds a domain [`Session`] from it, so services never see Actix types.

use actix_session::Session as CookieSession;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Session, User};

pub(crate) const USER_KEY: &str = "user";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(CookieSession);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: CookieSession) -> Self {
        Self(session)
    }

    /// Rebuild the domain session carried by the cookie.
    ///
    /// A cookie whose user payload no longer decodes is treated as empty.
    pub fn session(&self) -> Session {
        match self.0.get::<User>(USER_KEY) {
            Ok(Some(user)) => Session::for_user(user),
            Ok(None) => Session::default(),
            Err(error) => {
                warn!(%error, "discarding unreadable session user");
                self.0.remove(USER_KEY);
                Session::default()
            }
        }
    }

    /// Establish `user` as the acting user, replacing any previous one.
    ///
    /// The session id is renewed so a pre-login cookie cannot be reused.
    pub fn establish(&self, user: &User) -> Result<Session, Error> {
        self.0.renew();
        self.0
            .insert(USER_KEY, user)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        Ok(Session::for_user(user.clone()))
    }

    /// Drop the acting user and the cookie with it.
    pub fn clear(&self) -> Option<User> {
        let mut session = self.session();
        self.0.purge();
        session.clear()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = CookieSession::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
