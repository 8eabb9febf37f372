//! Single-user session state and its persistence hooks.
//!
//! # Responsibility
//! - Hold at most one signed-in `User` and answer role predicates.
//! - Load/save/clear the serialized current-user record at process
//!   boundaries through a `SessionStore`.
//!
//! # Invariants
//! - A stored record that fails to decode is cleared and treated as
//!   absent.
//! - The persisted record is the JSON form of `User` (tagged by `role`).

use crate::model::user::{User, UserRole};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "session store I/O failed: {err}"),
            Self::Encode(err) => write!(f, "session record encoding failed: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Persistence hook for the current-user record.
pub trait SessionStore {
    /// Reads the stored user; corrupt records are cleared and yield `None`.
    fn load(&mut self) -> SessionResult<Option<User>>;
    fn save(&mut self, user: &User) -> SessionResult<()>;
    fn clear(&mut self) -> SessionResult<()>;
}

fn decode_record(raw: &str) -> Option<User> {
    match serde_json::from_str(raw) {
        Ok(user) => Some(user),
        Err(err) => {
            warn!("event=session_load module=session status=corrupt error={err}");
            None
        }
    }
}

/// Keeps the serialized record in memory. Used by tests and embedders
/// without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    record: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a raw stored record, valid or not.
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: Some(raw.into()),
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&mut self) -> SessionResult<Option<User>> {
        let Some(raw) = self.record.as_deref() else {
            return Ok(None);
        };
        let user = decode_record(raw);
        if user.is_none() {
            self.record = None;
        }
        Ok(user)
    }

    fn save(&mut self, user: &User) -> SessionResult<()> {
        self.record = Some(serde_json::to_string(user)?);
        Ok(())
    }

    fn clear(&mut self) -> SessionResult<()> {
        self.record = None;
        Ok(())
    }
}

/// Stores the record as one JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&mut self) -> SessionResult<Option<User>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let user = decode_record(&raw);
        if user.is_none() {
            self.clear()?;
        }
        Ok(user)
    }

    fn save(&mut self, user: &User) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&mut self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// The signed-in user, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the session from a store once at startup.
    pub fn restore<S: SessionStore>(store: &mut S) -> SessionResult<Self> {
        let current = store.load()?;
        if let Some(user) = &current {
            info!(
                "event=session_restore module=session status=ok role={}",
                user.role()
            );
        }
        Ok(Self { current })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.current
            .as_ref()
            .is_some_and(|user| user.role() == role)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        self.current
            .as_ref()
            .is_some_and(|user| roles.contains(&user.role()))
    }

    pub(crate) fn set(&mut self, user: User) {
        self.current = Some(user);
    }

    pub(crate) fn clear(&mut self) {
        self.current = None;
    }
}
