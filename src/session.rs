//! Session Store
//!
//! The CLI's counterpart of the browser's local storage: a small TOML file
//! holding the signed-in identity, the auth flag and the access role.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::AppError;
use crate::models::{check_access, Identity, USER_ACCESS};

/// Contents of the session file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: Option<String>,
    #[serde(default)]
    pub auth: bool,
    pub access: Option<String>,
}

impl Session {
    /// The stored identity, if any
    pub fn identity(&self) -> Option<Identity> {
        self.email.clone().and_then(Identity::new)
    }

    /// The identity of a signed-in user
    pub fn require_user(&self) -> Result<Identity, AppError> {
        check_access(self.auth, self.access.as_deref())?;
        self.identity().ok_or(AppError::MissingIdentity)
    }
}

/// Session file errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse session file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Failed to write session: {0}")]
    Serialize(String),

    #[error("Invalid identity: {0:?}")]
    InvalidIdentity(String),
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session; a missing file is an empty session
    pub fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        toml::from_str(&content).map_err(|e| SessionError::Parse {
            path: self.path.clone(),
            error: e.to_string(),
        })
    }

    /// Store `email` as a signed-in user
    pub fn login(&self, email: &str) -> Result<Session, SessionError> {
        let identity =
            Identity::new(email).ok_or_else(|| SessionError::InvalidIdentity(email.to_string()))?;

        let session = Session {
            email: Some(identity.to_string()),
            auth: true,
            access: Some(USER_ACCESS.to_string()),
        };
        self.save(&session)?;

        tracing::info!(path = ?self.path, "Signed in as {}", identity);
        Ok(session)
    }

    /// Forget the stored session
    pub fn logout(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
        }
        Ok(())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content =
            toml::to_string(session).map_err(|e| SessionError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, e: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            error: e.to_string(),
        }
    }
}
