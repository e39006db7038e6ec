use crate::domain_port::{StoreError, TransportError};

/// Why a refresh episode failed. Shared by every request that waited on it,
/// hence `Clone`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RefreshError {
    #[error("no refresh token found")]
    MissingRefreshToken,
    #[error("refresh rejected with status {status}")]
    Rejected { status: u16 },
    #[error("refresh call failed: {0}")]
    Transport(TransportError),
    #[error("malformed refresh response: {0}")]
    Malformed(String),
    #[error("could not access credentials: {0}")]
    Store(StoreError),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("session refresh failed: {0}")]
    Refresh(#[from] RefreshError),
    #[error("refresh episode ended before the request was replayed")]
    RefreshAborted,
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid request: {0}")]
    Encode(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when the caller has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Refresh(_)) || self.is_unauthorized()
    }
}
