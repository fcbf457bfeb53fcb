//! Session context: the bearer token and where it is persisted.
//!
//! DESIGN
//! ======
//! One `Session` value is created at startup and cloned into every component
//! that issues requests. The token lives behind an `Arc<Mutex<…>>`; the only
//! mutation entry points are `login` and `logout`, so no call site touches
//! storage directly. A 401 from any request goes through `logout` as well.
//!
//! Persistence mirrors browser local storage: a single JSON document holding
//! the token under the fixed key `"token"`. Storage failures are logged and
//! never roll back the in-memory state.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not determine a config directory for the session file")]
    NoConfigDir,
    #[error("session file {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("session file {} is not valid JSON: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
}

// =============================================================================
// STORAGE
// =============================================================================

/// Persistence backend for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage exists but cannot be read.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the persisted token. Removing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Token persisted as `{"token": "..."}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config_dir>/workouts/session.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory.
    pub fn default_location() -> Result<Self, SessionError> {
        let dir = dirs::config_dir().ok_or(SessionError::NoConfigDir)?;
        Ok(Self::new(dir.join("workouts").join("session.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> SessionError {
        SessionError::Io { path: self.path.clone(), source }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let stored: StoredSession = serde_json::from_str(&content)
            .map_err(|source| SessionError::Json { path: self.path.clone(), source })?;
        Ok(stored.token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let stored = StoredSession { token: Some(token.to_owned()) };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|source| SessionError::Json { path: self.path.clone(), source })?;
        write_private(&self.path, json.as_bytes()).map_err(|e| self.io_err(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Shared session context. Cloning shares the same token.
#[derive(Clone)]
pub struct Session {
    token: Arc<Mutex<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("authenticated", &self.is_authenticated()).finish_non_exhaustive()
    }
}

impl Session {
    /// Restore the session from `store`. An unreadable store starts signed out.
    #[must_use]
    pub fn restore(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted session; starting signed out");
                None
            }
        };
        Self { token: Arc::new(Mutex::new(token)), store }
    }

    /// Signed-out session backed by an in-memory store.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::restore(Arc::new(MemoryTokenStore::default()))
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Adopt `token` as the current credential and persist it.
    pub fn login(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        if let Err(e) = self.store.save(token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }

    /// Drop the current credential and remove it from storage.
    pub fn logout(&self) {
        let had_token = self.token.lock().unwrap_or_else(PoisonError::into_inner).take().is_some();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session token");
        }
        if had_token {
            tracing::info!("session cleared");
        }
    }
}

/// Write `bytes` to `path`, readable by the owner only on Unix.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);

    let mut file = options.open(path)?;
    // mode only applies on creation; tighten files left by older writes
    #[cfg(unix)]
    file.set_permissions(std::os::unix::fs::PermissionsExt::from_mode(0o600))?;
    file.write_all(bytes)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
