use crate::domain_model::*;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("corrupt credential file: {0}")]
    Corrupt(String),
}

#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read one value; `None` means absent.
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, StoreError>;
    /// Write one value, replacing any previous one.
    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError>;
    /// Remove one value. Removing an absent value is not an error.
    async fn remove(&self, key: CredentialKey) -> Result<(), StoreError>;

    async fn load(&self) -> Result<Credentials, StoreError> {
        Ok(Credentials {
            access_token: self.get(CredentialKey::AccessToken).await?,
            refresh_token: self.get(CredentialKey::RefreshToken).await?,
        })
    }

    /// Store both values; an absent refresh token removes the stored one.
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        for key in CredentialKey::ALL {
            match credentials.get(key) {
                Some(value) => self.set(key, value).await?,
                None => self.remove(key).await?,
            }
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        for key in CredentialKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}
