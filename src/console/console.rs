use crate::application_impl::*;
use crate::application_port::*;
use crate::client::{AuthenticatedClient, SessionStatus};
use crate::domain_model::CredentialKey;
use crate::domain_port::*;
use crate::infra_fs::*;
use crate::infra_http::*;
use crate::infra_memory::*;
use crate::logger::*;
use crate::settings::{Api, Settings};
use std::sync::Arc;
use std::time::Duration;

/// Services wired against one backend and one credential store.
pub struct Console {
    pub auth_service: Arc<dyn AuthService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub reports_service: Arc<dyn ReportsService>,
    pub translation_service: Arc<dyn TranslationService>,
    client: AuthenticatedClient,
}

impl Console {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn CredentialStore> = match settings.credentials.backend.as_str() {
            "memory" => Arc::new(MemoryCredentialStore::new()),
            "file" => Arc::new(FileCredentialStore::new(&settings.credentials.path)),
            other => return Err(anyhow::anyhow!("Unknown credentials backend: {}", other)),
        };

        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(
            Duration::from_millis(settings.api.timeout_ms),
        )?);

        Self::with_backends(&settings.api, transport, store).await
    }

    pub async fn with_backends(
        api: &Api,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> anyhow::Result<Self> {
        // an unreadable store must not block `login`, which rewrites it
        let initial_status = match store.get(CredentialKey::AccessToken).await {
            Ok(Some(_)) => SessionStatus::Active,
            Ok(None) => SessionStatus::SignedOut,
            Err(e) => {
                warn!(error = %e, "stored credentials unreadable, starting signed out");
                SessionStatus::SignedOut
            }
        };
        debug!(?initial_status, base_url = %api.base_url, "console starting");

        let client = AuthenticatedClient::new(
            api.base_url.as_str(),
            api.refresh_path.as_str(),
            transport,
            store,
            initial_status,
        );

        Ok(Self {
            auth_service: Arc::new(RealAuthService::new(client.clone())),
            catalog_service: Arc::new(RealCatalogService::new(client.clone())),
            reports_service: Arc::new(RealReportsService::new(client.clone())),
            translation_service: Arc::new(RealTranslationService::new(client.clone())),
            client,
        })
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }
}
