//! Session Handle
//!
//! The bearer token and user id obtained at login. A [`Session`] is a cheap
//! clone over shared state: the REST client and the screens hold clones of
//! the same handle and read it on every request, so a login or logout is
//! seen by the next call without re-wiring anything.
//!
//! The session can be backed by a small JSON file so a login survives
//! restarts.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to access session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed session file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionData {
    token: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    data: Arc<RwLock<SessionData>>,
    path: Option<PathBuf>,
}

impl Session {
    /// A session that is never written to disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the session stored at `path`. A missing file is an empty session.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| SessionError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no session file, starting signed out");
                SessionData::default()
            }
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            path: Some(path),
        })
    }

    /// Current bearer token. An empty token counts as absent.
    pub fn token(&self) -> Option<String> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.token.clone().filter(|t| !t.is_empty())
    }

    pub fn user_id(&self) -> Option<String> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.user_id.clone().filter(|id| !id.is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: String, user_id: Option<String>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.token = Some(token);
        data.user_id = user_id;
        info!("session opened");
    }

    pub fn sign_out(&self) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *data = SessionData::default();
        info!("session closed");
    }

    /// Write the session back to its file. No-op for in-memory sessions.
    pub fn save(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = self
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let raw = serde_json::to_string_pretty(&data).map_err(|source| SessionError::Malformed {
            path: path.clone(),
            source,
        })?;
        std::fs::write(path, raw).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.json")).unwrap();
        assert!(!session.is_signed_in());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn saved_session_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = Session::load(&path).unwrap();
        session.sign_in("tok-123".into(), Some("u1".into()));
        session.save().unwrap();

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("tok-123"));
        assert_eq!(reloaded.user_id().as_deref(), Some("u1"));
    }

    #[test]
    fn clones_share_state() {
        let session = Session::in_memory();
        let other = session.clone();
        session.sign_in("abc".into(), None);
        assert_eq!(other.token().as_deref(), Some("abc"));
        other.sign_out();
        assert!(!session.is_signed_in());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let session = Session::in_memory();
        session.sign_in(String::new(), None);
        assert!(!session.is_signed_in());
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Session::load(&path),
            Err(SessionError::Malformed { .. })
        ));
    }
}
