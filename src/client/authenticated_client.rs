use super::dispatcher::{Dispatcher, settle};
use super::refresh_coordinator::RefreshCoordinator;
use super::session_terminator::{SessionStatus, SessionTerminator};
use super::ApiError;
use crate::domain_model::*;
use crate::domain_port::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

/// Entry point for every backend call: dispatch with the stored token and,
/// on a first 401, hand the request to the refresh coordinator.
#[derive(Clone)]
pub struct AuthenticatedClient {
    dispatcher: Arc<Dispatcher>,
    coordinator: Arc<RefreshCoordinator>,
    terminator: Arc<SessionTerminator>,
    store: Arc<dyn CredentialStore>,
}

impl AuthenticatedClient {
    pub fn new(
        base_url: impl Into<String>,
        refresh_path: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        initial_status: SessionStatus,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(base_url, transport, store.clone()));
        let terminator = Arc::new(SessionTerminator::new(store.clone(), initial_status));
        let coordinator = Arc::new(RefreshCoordinator::new(
            dispatcher.clone(),
            store.clone(),
            terminator.clone(),
            refresh_path,
        ));
        Self {
            dispatcher,
            coordinator,
            terminator,
            store,
        }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    pub fn terminator(&self) -> &Arc<SessionTerminator> {
        &self.terminator
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    /// Sends a request. Resolves with the 2xx response, or with the error for
    /// transport failures, non-2xx statuses, a second 401, or a failed
    /// refresh.
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let response = self.dispatcher.dispatch(&request).await?;
        if response.is_unauthorized() && !request.is_retried() {
            warn!(request_id = %request.id, path = %request.path, "access token rejected");
            return self.coordinator.recover(request).await;
        }
        settle(response)
    }

    /// Sends a request that must not take part in token recovery, such as a
    /// sign-in where a 401 means wrong credentials rather than an expired
    /// token.
    pub async fn send_unrecovered(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        settle(self.dispatcher.dispatch(&request).await?)
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        decode(self.send(request).await?)
    }

    pub async fn send_unrecovered_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        decode(self.send_unrecovered(request).await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(with_body(ApiRequest::post(path), body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(with_body(ApiRequest::put(path), body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn with_body<B: Serialize + ?Sized>(
    request: ApiRequest,
    body: &B,
) -> Result<ApiRequest, ApiError> {
    request
        .json(body)
        .map_err(|e| ApiError::Encode(e.to_string()))
}
