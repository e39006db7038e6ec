use super::dispatcher::{Dispatcher, settle};
use super::session_terminator::SessionTerminator;
use super::{ApiError, RefreshError};
use crate::domain_model::*;
use crate::domain_port::*;
use futures_util::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// A request that hit a 401 and waits for the running refresh episode.
struct PendingRequest {
    request: ApiRequest,
    reply: oneshot::Sender<Result<HttpResponse, ApiError>>,
}

enum RefreshState {
    Idle,
    Refreshing {
        trigger: PendingRequest,
        queue: Vec<PendingRequest>,
    },
}

/// Single-flight access token refresh.
///
/// The first request rejected with 401 starts an episode and a single
/// refresh call; requests rejected while that call is out join the queue.
/// When the episode settles, queued requests are replayed in arrival order,
/// then the one that started it. If the refresh fails the session is ended
/// and every participant receives the refresh error.
///
/// The state lock is never held across an await point.
pub struct RefreshCoordinator {
    dispatcher: Arc<Dispatcher>,
    store: Arc<dyn CredentialStore>,
    terminator: Arc<SessionTerminator>,
    refresh_path: String,
    state: Mutex<RefreshState>,
    refresh_episodes: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        store: Arc<dyn CredentialStore>,
        terminator: Arc<SessionTerminator>,
        refresh_path: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            store,
            terminator,
            refresh_path: refresh_path.into(),
            state: Mutex::new(RefreshState::Idle),
            refresh_episodes: AtomicU64::new(0),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.lock_state(), RefreshState::Refreshing { .. })
    }

    /// Requests waiting behind the one that started the running episode.
    pub fn queued(&self) -> usize {
        match &*self.lock_state() {
            RefreshState::Idle => 0,
            RefreshState::Refreshing { queue, .. } => queue.len(),
        }
    }

    /// Refresh episodes started since construction.
    pub fn refresh_episodes(&self) -> u64 {
        self.refresh_episodes.load(Ordering::SeqCst)
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes over a request whose first attempt was rejected with 401 and
    /// resolves with the outcome of its single replay.
    pub async fn recover(self: &Arc<Self>, mut request: ApiRequest) -> Result<HttpResponse, ApiError> {
        request.mark_retried();
        let request_id = request.id;
        let (reply, outcome) = oneshot::channel();
        let pending = PendingRequest { request, reply };

        let starts_episode = {
            let mut state = self.lock_state();
            match &mut *state {
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing {
                        trigger: pending,
                        queue: Vec::new(),
                    };
                    true
                }
                RefreshState::Refreshing { queue, .. } => {
                    queue.push(pending);
                    debug!(%request_id, position = queue.len(), "queued behind running refresh");
                    false
                }
            }
        };

        if starts_episode {
            debug!(%request_id, "starting refresh episode");
            let coordinator = Arc::clone(self);
            tokio::spawn(async move { coordinator.run_episode().await });
        }

        outcome.await.unwrap_or(Err(ApiError::RefreshAborted))
    }

    async fn run_episode(&self) {
        let _unwind = EpisodeGuard(self);
        self.refresh_episodes.fetch_add(1, Ordering::SeqCst);
        let result = self.refresh_access_token().await;

        if let Err(e) = &result {
            error!(error = %e, "refresh token failed");
            self.terminator.terminate(&e.to_string()).await;
        }

        let previous = std::mem::replace(&mut *self.lock_state(), RefreshState::Idle);
        let (trigger, queue) = match previous {
            RefreshState::Refreshing { trigger, queue } => (trigger, queue),
            RefreshState::Idle => {
                error!("refresh episode finished with no requests attached");
                return;
            }
        };
        let participants = queue.into_iter().chain(std::iter::once(trigger));

        match result {
            Ok(()) => {
                join_all(participants.map(|pending| self.replay(pending))).await;
            }
            Err(e) => {
                for pending in participants {
                    let _ = pending.reply.send(Err(ApiError::Refresh(e.clone())));
                }
            }
        }
    }

    async fn replay(&self, pending: PendingRequest) {
        let PendingRequest { request, reply } = pending;
        if reply.is_closed() {
            debug!(request_id = %request.id, "caller gone, skipping replay");
            return;
        }

        let result = match self.dispatcher.dispatch(&request).await {
            Ok(response) => settle(response),
            Err(e) => Err(e),
        };
        if reply.send(result).is_err() {
            debug!(request_id = %request.id, "caller gone before replay finished");
        }
    }

    /// Exchanges the refresh token for a new access token and persists it.
    /// Goes straight to the dispatcher so a rejected refresh is never
    /// itself recovered.
    async fn refresh_access_token(&self) -> Result<(), RefreshError> {
        let refresh_token = self
            .store
            .get(CredentialKey::RefreshToken)
            .await
            .map_err(RefreshError::Store)?
            .ok_or(RefreshError::MissingRefreshToken)?;

        info!("refreshing access token");
        let request = ApiRequest::post(self.refresh_path.as_str())
            .json(&RefreshTokenBody {
                refresh_token: &refresh_token,
            })
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;

        let response = self
            .dispatcher
            .dispatch(&request)
            .await
            .map_err(|e| match e {
                ApiError::Transport(e) => RefreshError::Transport(e),
                ApiError::Store(e) => RefreshError::Store(e),
                other => RefreshError::Malformed(other.to_string()),
            })?;
        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
            });
        }

        let grant: TokenGrant = response
            .json()
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;

        self.store
            .set(CredentialKey::AccessToken, &grant.access_token)
            .await
            .map_err(RefreshError::Store)?;
        if let Some(rotated) = grant.refresh_token.as_deref() {
            self.store
                .set(CredentialKey::RefreshToken, rotated)
                .await
                .map_err(RefreshError::Store)?;
        }

        info!(token = %mask_token(&grant.access_token), "access token refreshed");
        Ok(())
    }
}

/// Resets the state if an episode unwinds before detaching its requests.
/// Dropping their reply senders resolves every waiting caller with
/// `ApiError::RefreshAborted`.
struct EpisodeGuard<'a>(&'a RefreshCoordinator);

impl Drop for EpisodeGuard<'_> {
    fn drop(&mut self) {
        let stranded = std::mem::replace(&mut *self.0.lock_state(), RefreshState::Idle);
        if let RefreshState::Refreshing { queue, .. } = &stranded {
            error!(queued = queue.len(), "refresh episode aborted");
        }
    }
}
