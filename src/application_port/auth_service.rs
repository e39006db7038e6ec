use crate::client::{ApiError, SessionStatus};
use crate::domain_model::{Role, User};
use crate::domain_port::StoreError;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("{0} accounts cannot use the console; sign in from the mobile app")]
    RoleNotPermitted(Role),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Body of a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub user: User,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Signs in and stores both tokens. Student accounts are turned away and
    /// any failure leaves the credential store empty.
    async fn login(&self, input: LoginInput) -> Result<LoginResult, AuthError>;
    async fn register(&self, input: RegisterInput) -> Result<serde_json::Value, AuthError>;
    async fn current_user(&self) -> Result<User, AuthError>;
    /// Picks up a stored session. `None` when there is no usable one; stale
    /// credentials are cleared on the way.
    async fn restore_session(&self) -> Result<Option<User>, AuthError>;
    async fn logout(&self) -> Result<(), AuthError>;
    fn session_status(&self) -> watch::Receiver<SessionStatus>;
}
