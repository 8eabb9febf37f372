//! Sign-in use-case service.
//!
//! # Responsibility
//! - Authenticate against the user repository and keep the in-memory
//!   session and its persisted copy in step.
//!
//! # Invariants
//! - Failed sign-in never distinguishes unknown email from wrong password.
//! - `logout` clears both the in-memory user and the stored record.
//! - A restored user is refreshed from the repository; users that no
//!   longer exist are signed out.

use crate::model::user::{User, UserRole};
use crate::model::Entity;
use crate::repo::UserRepository;
use crate::session::{Session, SessionError, SessionStore};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    Session(SessionError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCredentials => None,
            Self::Session(err) => Some(err),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

/// Sign-in service over a user repository and a session store.
pub struct AuthService<'repo, R: UserRepository, S: SessionStore> {
    repo: &'repo R,
    store: S,
    session: Session,
}

impl<'repo, R: UserRepository, S: SessionStore> AuthService<'repo, R, S> {
    /// Builds the service and restores any stored session.
    pub fn new(repo: &'repo R, mut store: S) -> AuthResult<Self> {
        let mut session = Session::restore(&mut store)?;

        let refreshed = session
            .current_user()
            .map(|user| repo.get_user(user.id()));
        match refreshed {
            Some(Some(user)) => session.set(user),
            Some(None) => {
                info!("event=session_restore module=auth status=stale");
                session.clear();
                store.clear()?;
            }
            None => {}
        }

        Ok(Self {
            repo,
            store,
            session,
        })
    }

    /// Signs in and persists the session record.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<&User> {
        let user = self
            .repo
            .authenticate(email, password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.store.save(&user)?;
        info!("event=login module=auth status=ok role={}", user.role());
        self.session.set(user);
        self.session
            .current_user()
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Signs out and removes the persisted record.
    pub fn logout(&mut self) -> AuthResult<()> {
        self.session.clear();
        self.store.clear()?;
        info!("event=logout module=auth status=ok");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.session.has_role(role)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        self.session.has_any_role(roles)
    }

    pub fn repo(&self) -> &'repo R {
        self.repo
    }

    /// Returns the store, e.g. to inspect the persisted record.
    pub fn store(&self) -> &S {
        &self.store
    }
}
