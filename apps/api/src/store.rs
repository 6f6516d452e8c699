//! Session store — one pretty-printed JSON document mapping session id to `Session`.
//!
//! Every mutation is read-all, insert, write-all. Writers are serialized by a single
//! async mutex so updates to different sessions never clobber each other. Two
//! requests racing on the same session still resolve last-writer-wins.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::models::session::Session;

pub type SessionMap = BTreeMap<String, Session>;

#[derive(Clone)]
pub struct SessionStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every session. A missing file is an empty store; an unreadable or
    /// malformed file is logged and also treated as empty.
    pub async fn read_all(&self) -> SessionMap {
        let contents = match tokio::fs::read_to_string(self.path()).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return SessionMap::new(),
            Err(e) => {
                warn!(
                    "Session store {} is unreadable, treating as empty: {e}",
                    self.path().display()
                );
                return SessionMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(
                    "Session store {} is malformed, treating as empty: {e}",
                    self.path().display()
                );
                SessionMap::new()
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.read_all().await.remove(id)
    }

    /// Inserts or replaces one session, leaving the others untouched.
    pub async fn put(&self, id: &str, session: Session) -> Result<()> {
        let guard = self.write_lock.lock().await;
        let mut sessions = self.read_all().await;
        sessions.insert(id.to_string(), session);
        self.write_all(&guard, &sessions).await
    }

    /// Replaces the whole store with `sessions`. The guard proves the caller
    /// holds the writer lock for the whole read-modify-write.
    async fn write_all(&self, _guard: &MutexGuard<'_, ()>, sessions: &SessionMap) -> Result<()> {
        let json = serde_json::to_string_pretty(sessions).context("Failed to encode sessions")?;
        let path = Arc::clone(&self.path);

        tokio::task::spawn_blocking(move || replace_file(&path, json.as_bytes()))
            .await
            .context("Session store writer task failed")??;

        debug!(
            "Wrote {} session(s) to {}",
            sessions.len(),
            self.path().display()
        );
        Ok(())
    }
}

/// Writes `bytes` to a temp file beside `path`, then renames it into place.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create store directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}
