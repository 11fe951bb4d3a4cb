//! Session lifecycle management
//!
//! [`OnePassword`] owns the session used by every command. When it manages
//! the session itself it signs in on first use, signs in again once when a
//! command fails because the session expired, and signs out when dropped.
//! A pre-authenticated client uses a session supplied by the caller and
//! surfaces every error unchanged.
//!
//! States: no session -> authenticating -> active -> (sign out) no session,
//! and active -> (expired) authenticating -> active.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{info, warn};

use crate::commands::Entities;
use crate::config::Config;
use crate::error::Result;
use crate::group::Group;
use crate::op::{Op, OpExecutor};
use crate::session::Session;
use crate::user::User;
use crate::vault::Vault;

/// Function returning the account password when signing in
pub type PasswordProvider = Arc<dyn Fn() -> String + Send + Sync>;

/// Credentials used to sign in
#[derive(Clone)]
pub struct Credentials {
    pub sign_in_address: String,
    pub email_address: String,
    pub secret_key: String,
    password: PasswordProvider,
}

impl Credentials {
    /// The password is requested from `password` on each sign-in instead of
    /// being stored.
    pub fn new<F>(
        sign_in_address: impl Into<String>,
        email_address: impl Into<String>,
        secret_key: impl Into<String>,
        password: F,
    ) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            sign_in_address: sign_in_address.into(),
            email_address: email_address.into(),
            secret_key: secret_key.into(),
            password: Arc::new(password),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("sign_in_address", &self.sign_in_address)
            .field("email_address", &self.email_address)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Typed client for the `op` executable
pub struct OnePassword<X: OpExecutor = Op> {
    op: X,
    credentials: Option<Credentials>,
    auto_manage: bool,
    session: Mutex<Option<Session>>,
}

impl OnePassword<Op> {
    /// Client that signs in on first use and renews expired sessions
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self::with_executor(Op::new(config), credentials, true)
    }

    /// Client reusing a session obtained elsewhere; it never signs in
    pub fn pre_authenticated(config: Config, session: Session) -> Self {
        Self::pre_authenticated_with(Op::new(config), session)
    }
}

impl<X: OpExecutor> OnePassword<X> {
    /// Client over any executor.
    ///
    /// With `auto_manage` unset the client only signs in when
    /// [`sign_in`](Self::sign_in) is called and never retries.
    pub fn with_executor(op: X, credentials: Credentials, auto_manage: bool) -> Self {
        Self {
            op,
            credentials: Some(credentials),
            auto_manage,
            session: Mutex::new(None),
        }
    }

    /// Pre-authenticated client over any executor
    pub fn pre_authenticated_with(op: X, session: Session) -> Self {
        Self {
            op,
            credentials: None,
            auto_manage: false,
            session: Mutex::new(Some(session)),
        }
    }

    /// Pre-authenticated client sharing this client's current session.
    ///
    /// The returned client does not sign out when dropped; this one still does.
    pub fn to_pre_authenticated(&self) -> Result<OnePassword<X>>
    where
        X: Clone,
    {
        let session = self.ensure_session()?;
        Ok(OnePassword {
            op: self.op.clone(),
            credentials: None,
            auto_manage: false,
            session: Mutex::new(session),
        })
    }

    pub fn users(&self) -> Entities<'_, User, X> {
        Entities::new(self)
    }

    pub fn groups(&self) -> Entities<'_, Group, X> {
        Entities::new(self)
    }

    pub fn vaults(&self) -> Entities<'_, Vault, X> {
        Entities::new(self)
    }

    /// Version of the executable
    pub fn version(&self) -> Result<String> {
        self.op.version()
    }

    /// Whether this client signs in and renews sessions on its own
    pub fn is_auto_managed(&self) -> bool {
        self.auto_manage
    }

    /// The currently held session
    pub fn session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    /// Sign in, replacing any held session.
    ///
    /// A pre-authenticated client has no credentials and keeps its session.
    pub fn sign_in(&self) -> Result<Option<Session>> {
        let mut guard = self.lock_session();
        if let Some(credentials) = &self.credentials {
            *guard = Some(self.sign_in_with(credentials)?);
        }
        Ok(guard.clone())
    }

    /// Sign out and forget the session
    pub fn sign_out(&self) -> Result<()> {
        let session = self.lock_session().take();
        match session {
            Some(session) => self.op.signout(&session),
            None => Ok(()),
        }
    }

    /// Run a subcommand with the managed session
    pub(crate) fn execute(&self, arguments: &[Option<String>]) -> Result<String> {
        let session = self.ensure_session()?;
        match self.op.execute(session.as_ref(), arguments) {
            Err(e) if self.auto_manage && e.is_session_expired() => {
                warn!("session is no longer valid, signing in again: {}", e);
                let renewed = self.renew_session(session.as_ref())?;
                self.op.execute(renewed.as_ref(), arguments)
            }
            result => result,
        }
    }

    fn ensure_session(&self) -> Result<Option<Session>> {
        let mut guard = self.lock_session();
        if guard.is_none() && self.auto_manage {
            if let Some(credentials) = &self.credentials {
                *guard = Some(self.sign_in_with(credentials)?);
            }
        }
        Ok(guard.clone())
    }

    /// Replace `stale` with a fresh session, unless another caller already did
    fn renew_session(&self, stale: Option<&Session>) -> Result<Option<Session>> {
        let mut guard = self.lock_session();
        let already_renewed = match (guard.as_ref(), stale) {
            (Some(current), Some(stale)) => current != stale,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if !already_renewed {
            if let Some(credentials) = &self.credentials {
                *guard = Some(self.sign_in_with(credentials)?);
            }
        }
        Ok(guard.clone())
    }

    fn sign_in_with(&self, credentials: &Credentials) -> Result<Session> {
        info!("signing in as {}", credentials.email_address);
        let password = credentials.password.as_ref();
        self.op.signin(
            &credentials.sign_in_address,
            &credentials.email_address,
            &credentials.secret_key,
            &|| password(),
        )
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        // A panic while holding the lock leaves the session itself intact.
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<X: OpExecutor> Drop for OnePassword<X> {
    fn drop(&mut self) {
        // Only sessions created by this client are signed out.
        if self.credentials.is_none() {
            return;
        }
        if let Err(e) = self.sign_out() {
            warn!("could not sign out: {}", e);
        }
    }
}

impl<X: OpExecutor> fmt::Debug for OnePassword<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnePassword")
            .field("credentials", &self.credentials)
            .field("auto_manage", &self.auto_manage)
            .field("session", &self.session())
            .finish()
    }
}
