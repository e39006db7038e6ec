use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialFile {
    #[serde(flatten)]
    credentials: Credentials,
    updated_at: DateTime<Utc>,
}

/// Credential store persisted as a small JSON document, so a session
/// survives process restarts.
///
/// The file is read once and cached; every write rewrites it through a
/// temporary file and a rename.
pub struct FileCredentialStore {
    path: PathBuf,
    cache: Mutex<Option<Credentials>>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<Credentials, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let file: CredentialFile = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                debug!(path = %self.path.display(), updated_at = %file.updated_at, "credentials loaded");
                Ok(file.credentials)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Credentials::default()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn write_file(&self, credentials: &Credentials) -> Result<(), StoreError> {
        if credentials.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::Io(e.to_string())),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let file = CredentialFile {
            credentials: credentials.clone(),
            updated_at: Utc::now(),
        };
        let bytes =
            serde_json::to_vec_pretty(&file).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }

    async fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Credentials) + Send,
    {
        let mut cache = self.cache.lock().await;
        let mut next = match cache.as_ref() {
            Some(current) => current.clone(),
            None => match self.read_file().await {
                Ok(current) => current,
                Err(StoreError::Corrupt(e)) => {
                    warn!(path = %self.path.display(), error = %e, "discarding unreadable credentials");
                    Credentials::default()
                }
                Err(e) => return Err(e),
            },
        };
        change(&mut next);
        if let Err(e) = self.write_file(&next).await {
            warn!(path = %self.path.display(), error = %e, "failed to persist credentials");
            *cache = None;
            return Err(e);
        }
        *cache = Some(next);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, StoreError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        Ok(cache
            .as_ref()
            .and_then(|credentials| credentials.get(key))
            .map(str::to_owned))
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError> {
        let value = value.to_owned();
        self.update(move |credentials| match key {
            CredentialKey::AccessToken => credentials.access_token = Some(value),
            CredentialKey::RefreshToken => credentials.refresh_token = Some(value),
        })
        .await
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), StoreError> {
        self.update(move |credentials| match key {
            CredentialKey::AccessToken => credentials.access_token = None,
            CredentialKey::RefreshToken => credentials.refresh_token = None,
        })
        .await
    }
}
