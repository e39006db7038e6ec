use crate::domain_port::CredentialStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionStatus {
    Active,
    SignedOut,
    /// The session could not be kept alive; the user must sign in again.
    Ended { reason: String },
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

/// Clears credentials when a session cannot be recovered and tells whoever
/// watches the session status. Navigation is up to the observer.
pub struct SessionTerminator {
    store: Arc<dyn CredentialStore>,
    status: watch::Sender<SessionStatus>,
}

impl SessionTerminator {
    pub fn new(store: Arc<dyn CredentialStore>, initial: SessionStatus) -> Self {
        let (status, _) = watch::channel(initial);
        Self { store, status }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn announce(&self, status: SessionStatus) {
        self.status.send_replace(status);
    }

    pub async fn terminate(&self, reason: &str) {
        if let Err(e) = self.store.clear().await {
            error!(error = %e, "failed to clear credentials while ending session");
        }
        info!(reason, "session ended");
        self.announce(SessionStatus::Ended {
            reason: reason.to_owned(),
        });
    }
}
