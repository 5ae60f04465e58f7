//! Content fingerprinting, change detection and the last-digest slot.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::BotError;

/// Hex fingerprint of a text blob. Identical bytes always map to the same
/// digest; any byte difference changes it.
pub fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// One fetched feed revision paired with its fingerprint. Immutable once
/// created; owned by a single pipeline run.
#[derive(Debug, Clone)]
pub struct ContentSnapshot {
    pub text: String,
    pub digest: String,
}

impl ContentSnapshot {
    pub fn new(text: String) -> Self {
        let digest = digest(&text);
        Self { text, digest }
    }
}

/// Pure comparison against the last committed digest. An absent or empty
/// last digest always counts as changed, so a first run proceeds.
pub fn has_changed(snapshot: &ContentSnapshot, last: Option<&str>) -> bool {
    match last {
        Some(last) if !last.is_empty() => snapshot.digest != last,
        _ => true,
    }
}

/// Durable scalar slot holding the last committed digest. Read at pipeline
/// start, written exactly once at the end of a successful run.
#[async_trait]
pub trait DigestStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, BotError>;
    async fn set(&self, digest: &str) -> Result<(), BotError>;
}

/// Process-local slot, for tests and single-shot runs.
#[derive(Default)]
pub struct InMemoryDigestStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryDigestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_digest(digest: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(digest.into())),
        }
    }
}

#[async_trait]
impl DigestStore for InMemoryDigestStore {
    async fn get(&self) -> Result<Option<String>, BotError> {
        Ok(self.slot.lock().expect("digest slot poisoned").clone())
    }

    async fn set(&self, digest: &str) -> Result<(), BotError> {
        *self.slot.lock().expect("digest slot poisoned") = Some(digest.to_string());
        Ok(())
    }
}

/// File-backed slot used by the binary between scheduled invocations.
pub struct FileDigestStore {
    path: PathBuf,
}

impl FileDigestStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DigestStore for FileDigestStore {
    async fn get(&self) -> Result<Option<String>, BotError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BotError::Store(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn set(&self, digest: &str) -> Result<(), BotError> {
        tokio::fs::write(&self.path, digest).await.map_err(|e| {
            BotError::Store(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
