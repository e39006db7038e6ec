use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the two persisted credential values.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CredentialKey {
    #[serde(rename = "accessToken")]
    AccessToken,
    #[serde(rename = "refreshToken")]
    RefreshToken,
}

impl CredentialKey {
    pub const ALL: [CredentialKey; 2] = [CredentialKey::AccessToken, CredentialKey::RefreshToken];

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::AccessToken => "accessToken",
            CredentialKey::RefreshToken => "refreshToken",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of both credential values.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    pub fn get(&self, key: CredentialKey) -> Option<&str> {
        match key {
            CredentialKey::AccessToken => self.access_token.as_deref(),
            CredentialKey::RefreshToken => self.refresh_token.as_deref(),
        }
    }
}

/// Body of a successful token refresh: `{ accessToken, refreshToken? }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenBody<'a> {
    pub refresh_token: &'a str,
}

/// Shortens a token for log output.
pub fn mask_token(token: &str) -> String {
    const VISIBLE: usize = 12;
    match token.char_indices().nth(VISIBLE) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => "***".to_owned(),
    }
}
