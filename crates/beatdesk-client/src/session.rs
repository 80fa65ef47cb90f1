//! # Session Context
//!
//! Holds the operator's bearer token and username.
//!
//! The session is an explicit object handed to the [`ApiClient`](crate::ApiClient)
//! rather than ambient global state. Where it is persisted is decided by the
//! injected [`SessionStore`]: [`MemorySessionStore`] keeps it for the lifetime of
//! the process, [`FileSessionStore`] writes it to the user's config directory.
//! Changes are broadcast as [`SessionEvent`]s so the embedding UI can react to a
//! sign-out triggered by an expired token.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

/// Capacity of the session event channel.
const EVENT_CAPACITY: usize = 16;

/// Errors raised by session stores.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("session i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored session could not be (de)serialized.
    #[error("session format error: {0}")]
    Format(#[from] serde_json::Error),

    /// No location is available for the session file.
    #[error("could not determine session directory")]
    NoLocation,
}

/// Credentials of a signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Operator login name.
    pub username: String,
    /// Bearer token sent with every request.
    pub token: String,
    /// When the token stops being accepted.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionData {
    /// Creates session data without an expiry.
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            expires_at: None,
        }
    }

    /// Sets the expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns true if the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Change notifications for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An operator signed in.
    SignedIn {
        /// Operator login name.
        username: String,
    },
    /// The operator signed out.
    SignedOut,
    /// The token expired or was rejected by the backend.
    Expired,
}

/// Persistence medium for the session.
pub trait SessionStore: Send + Sync {
    /// Loads the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the medium cannot be read.
    fn load(&self) -> Result<Option<SessionData>, SessionError>;

    /// Replaces the stored session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the medium cannot be written.
    fn save(&self, data: &SessionData) -> Result<(), SessionError>;

    /// Removes the stored session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the medium cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session store that lives only in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: RwLock<Option<SessionData>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionData>, SessionError> {
        Ok(self.data.read().clone())
    }

    fn save(&self, data: &SessionData) -> Result<(), SessionError> {
        *self.data.write() = Some(data.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.data.write() = None;
        Ok(())
    }
}

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store in the platform config directory
    /// (`<config dir>/beatdesk/session.json`).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoLocation`] if the platform has no config directory.
    pub fn in_config_dir() -> Result<Self, SessionError> {
        dirs::config_dir()
            .map(|p| Self::new(p.join("beatdesk").join("session.json")))
            .ok_or(SessionError::NoLocation)
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionData>, SessionError> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "Session file not found");
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let data = serde_json::from_str(&contents)?;
        tracing::debug!(path = ?self.path, "Loaded session");
        Ok(Some(data))
    }

    fn save(&self, data: &SessionData) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, contents)?;
        tracing::debug!(path = ?self.path, "Saved session");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared session context.
///
/// Cheap to clone; all clones see the same session.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    current: Arc<RwLock<Option<SessionData>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Creates a session backed by `store`, restoring any stored credentials.
    ///
    /// A store that cannot be read, or holds an expired token, starts signed out.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let restored = match store.load() {
            Ok(Some(data)) if data.is_expired_at(Utc::now()) => {
                tracing::info!(username = %data.username, "Stored session expired");
                if let Err(e) = store.clear() {
                    tracing::warn!(error = %e, "Failed to clear expired session");
                }
                None
            }
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load session, starting signed out");
                None
            }
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            current: Arc::new(RwLock::new(restored)),
            events,
        }
    }

    /// Creates a session kept only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Signs an operator in and persists the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store cannot persist the session. The
    /// in-memory session is still updated in that case.
    pub fn sign_in(&self, data: SessionData) -> Result<(), SessionError> {
        let username = data.username.clone();
        let persisted = self.store.save(&data);
        *self.current.write() = Some(data);
        tracing::info!(username = %username, "Signed in");
        let _ = self.events.send(SessionEvent::SignedIn { username });
        persisted
    }

    /// Signs the operator out and removes the stored credentials.
    pub fn sign_out(&self) {
        self.end(SessionEvent::SignedOut);
    }

    /// Ends the session because the backend rejected the token.
    pub fn expire(&self) {
        self.end(SessionEvent::Expired);
    }

    fn end(&self, event: SessionEvent) {
        let previous = self.current.write().take();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        if let Some(data) = previous {
            tracing::info!(username = %data.username, ?event, "Session ended");
            let _ = self.events.send(event);
        }
    }

    /// The bearer token, if signed in and not expired.
    ///
    /// An expired token ends the session.
    pub fn token(&self) -> Option<String> {
        let expired = {
            let current = self.current.read();
            match current.as_ref() {
                Some(data) if data.is_expired_at(Utc::now()) => true,
                Some(data) => return Some(data.token.clone()),
                None => return None,
            }
        };
        if expired {
            self.expire();
        }
        None
    }

    /// The signed-in operator's username.
    pub fn username(&self) -> Option<String> {
        self.current.read().as_ref().map(|d| d.username.clone())
    }

    /// Returns true if an operator is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}
