use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

/// Process-lifetime credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: DashMap<CredentialKey, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: &Credentials) -> Self {
        let store = Self::new();
        for key in CredentialKey::ALL {
            if let Some(value) = credentials.get(key) {
                store.values.insert(key, value.to_owned());
            }
        }
        store
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), StoreError> {
        self.values.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), StoreError> {
        self.values.remove(&key);
        Ok(())
    }
}
