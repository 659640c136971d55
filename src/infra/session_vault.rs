//! Durable single-slot storage for the active conversation identity.
//!
//! Two string entries survive reloads: the chat id and its display name.
//! Concurrent processes are not coordinated; each instance clears and
//! reclaims the slot on startup.

use std::{fs, io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::infra::error::AppError;

const VAULT_UNREADABLE: &str = "SESSION_VAULT_UNREADABLE";

/// The persisted identity of the last active conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub chat_id: i64,
    pub chat_name: String,
}

#[derive(Debug, Clone)]
pub struct SessionVault {
    path: PathBuf,
}

impl SessionVault {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the stored identity. A missing or corrupt file reads as empty;
    /// corruption is logged, never fatal.
    pub fn read(&self) -> Result<Option<StoredSession>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AppError::SessionVaultRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match toml::from_str(&raw) {
            Ok(stored) => Ok(Some(stored)),
            Err(error) => {
                tracing::warn!(
                    code = VAULT_UNREADABLE,
                    path = %self.path.display(),
                    error = %error,
                    "session vault is unreadable, treating as empty"
                );
                Ok(None)
            }
        }
    }

    pub fn write(&self, session: &StoredSession) -> Result<(), AppError> {
        let raw = toml::to_string(session).unwrap_or_default();
        fs::write(&self.path, raw).map_err(|source| AppError::SessionVaultWrite {
            path: self.path.clone(),
            source,
        })
    }

    /// Removes the stored identity. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool, AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::SessionVaultWrite {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_in_temp_dir() -> (tempfile::TempDir, SessionVault) {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let vault = SessionVault::new(dir.path().join("session.toml"));
        (dir, vault)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, vault) = vault_in_temp_dir();

        assert_eq!(vault.read().expect("read should succeed"), None);
    }

    #[test]
    fn round_trips_the_stored_identity() {
        let (_dir, vault) = vault_in_temp_dir();
        let stored = StoredSession {
            chat_id: 42,
            chat_name: "Backend".to_owned(),
        };

        vault.write(&stored).expect("write should succeed");

        assert_eq!(vault.read().expect("read should succeed"), Some(stored));
    }

    #[test]
    fn clear_removes_the_slot_and_is_idempotent() {
        let (_dir, vault) = vault_in_temp_dir();
        vault
            .write(&StoredSession {
                chat_id: 1,
                chat_name: "General".to_owned(),
            })
            .expect("write should succeed");

        assert!(vault.clear().expect("clear should succeed"));
        assert!(!vault.clear().expect("second clear should succeed"));
        assert_eq!(vault.read().expect("read should succeed"), None);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let (_dir, vault) = vault_in_temp_dir();
        fs::write(vault.path.clone(), "not [valid toml").expect("write fixture");

        assert_eq!(vault.read().expect("read should succeed"), None);
    }
}
