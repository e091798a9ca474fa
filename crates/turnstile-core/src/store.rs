//! Credential storage.
//!
//! The session cookie becomes an injected store interface here, so the
//! guard can run against an in-memory double in tests and a file-backed
//! jar in the CLI.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name under which the login flow stores the session credential.
pub const CREDENTIAL_KEY: &str = "auth_token";

/// Single-value credential storage, keyed by [`CREDENTIAL_KEY`].
///
/// `remove` is the only mutator the guard itself ever calls, and only on
/// invalid or expired credentials. `write` exists for the login flow and
/// the CLI's `session store`.
pub trait CredentialStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, credential: &str);
    fn remove(&mut self);
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            slot: Some(credential.into()),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.slot.clone()
    }

    fn write(&mut self, credential: &str) {
        self.slot = Some(credential.to_string());
    }

    fn remove(&mut self) {
        self.slot = None;
    }
}

/// File-backed single-credential jar, the CLI's stand-in for the browser
/// cookie. The file holds the raw credential string and nothing else.
#[derive(Debug, Clone)]
pub struct JarStore {
    path: PathBuf,
}

impl JarStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fallible write for callers that need the error (the CLI reports it);
    /// the trait's `write` routes through here and logs on failure.
    pub fn persist(&self, credential: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, credential)
    }

    /// Fallible removal; missing file counts as already removed.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl CredentialStore for JarStore {
    fn read(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn write(&mut self, credential: &str) {
        if let Err(e) = self.persist(credential) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist credential");
        }
    }

    fn remove(&mut self) {
        if let Err(e) = self.clear() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove credential");
        }
    }
}
