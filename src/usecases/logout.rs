use crate::infra::{error::AppError, session_vault::SessionVault};

const LOGOUT_BEACON_FAILED: &str = "LOGOUT_BEACON_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub vault_cleared: bool,
    pub server_notified: bool,
}

/// Fire-and-forget server-side session termination.
pub trait SessionTerminator {
    fn logout(&self) -> Result<(), String>;
}

impl<T: SessionTerminator + ?Sized> SessionTerminator for &T {
    fn logout(&self) -> Result<(), String> {
        (*self).logout()
    }
}

/// Clears the durable session slot and posts the logout beacon. The beacon
/// is best-effort: a dead server must not block local cleanup.
pub fn logout_and_reset(
    vault: &SessionVault,
    terminator: &dyn SessionTerminator,
) -> Result<LogoutOutcome, AppError> {
    let vault_cleared = vault.clear()?;

    let server_notified = match terminator.logout() {
        Ok(()) => true,
        Err(details) => {
            tracing::warn!(
                code = LOGOUT_BEACON_FAILED,
                details,
                "logout beacon not delivered"
            );
            false
        }
    };

    Ok(LogoutOutcome {
        vault_cleared,
        server_notified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::session_vault::StoredSession;

    struct StubTerminator {
        result: Result<(), String>,
    }

    impl SessionTerminator for StubTerminator {
        fn logout(&self) -> Result<(), String> {
            self.result.clone()
        }
    }

    #[test]
    fn clears_vault_and_notifies_server() {
        let dir = tempfile::tempdir().expect("temp dir");
        let vault = SessionVault::new(dir.path().join("session.toml"));
        vault
            .write(&StoredSession {
                chat_id: 1,
                chat_name: "General".to_owned(),
            })
            .expect("seed vault");

        let outcome = logout_and_reset(&vault, &StubTerminator { result: Ok(()) })
            .expect("logout should succeed");

        assert!(outcome.vault_cleared);
        assert!(outcome.server_notified);
        assert_eq!(vault.read().expect("read should succeed"), None);
    }

    #[test]
    fn beacon_failure_still_clears_locally() {
        let dir = tempfile::tempdir().expect("temp dir");
        let vault = SessionVault::new(dir.path().join("session.toml"));
        vault
            .write(&StoredSession {
                chat_id: 1,
                chat_name: "General".to_owned(),
            })
            .expect("seed vault");

        let outcome = logout_and_reset(
            &vault,
            &StubTerminator {
                result: Err("connection refused".to_owned()),
            },
        )
        .expect("logout should succeed");

        assert!(outcome.vault_cleared);
        assert!(!outcome.server_notified);
    }

    #[test]
    fn logout_is_idempotent_when_vault_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let vault = SessionVault::new(dir.path().join("session.toml"));

        let outcome = logout_and_reset(&vault, &StubTerminator { result: Ok(()) })
            .expect("logout should succeed");

        assert!(!outcome.vault_cleared);
    }
}
