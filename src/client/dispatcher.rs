use super::ApiError;
use crate::domain_model::endpoint::join_url;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves requests against the base URL and attaches the stored access
/// token. It never reacts to the response status.
pub struct Dispatcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
}

impl Dispatcher {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let token = self.store.get(CredentialKey::AccessToken).await?;

        match token.as_deref() {
            Some(token) => debug!(
                request_id = %request.id,
                method = %request.method,
                path = %request.path,
                retried = request.is_retried(),
                token = %mask_token(token),
                "dispatching request"
            ),
            None => warn!(
                request_id = %request.id,
                method = %request.method,
                path = %request.path,
                "dispatching request without access token"
            ),
        }

        let http_request = self.resolve(request, token.as_deref())?;
        let response = self.transport.execute(http_request).await?;
        debug!(request_id = %request.id, status = response.status, "response received");
        Ok(response)
    }

    fn resolve(&self, request: &ApiRequest, token: Option<&str>) -> Result<HttpRequest, ApiError> {
        let url = join_url(&self.base_url, &request.path);
        let url = if request.query.is_empty() {
            reqwest::Url::parse(&url)
        } else {
            reqwest::Url::parse_with_params(&url, &request.query)
        }
        .map_err(|e| ApiError::Encode(format!("{}: {}", url, e)))?;

        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        headers.extend(request.headers.iter().cloned());
        if let Some(token) = token {
            headers.push(("Authorization".to_owned(), format!("Bearer {}", token)));
        }

        let body = request
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        Ok(HttpRequest {
            method: request.method,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

/// Maps a raw response to the caller-facing outcome: 2xx passes, anything
/// else is an error carrying the status and body.
pub(crate) fn settle(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: response.status,
            body: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::*;

    fn echo() -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport::new(|_| Ok(HttpResponse::new(200, "{}"))))
    }

    #[tokio::test]
    async fn attaches_stored_token() {
        let transport = echo();
        let store = Arc::new(MemoryCredentialStore::with_credentials(&Credentials::new(
            "abc", None,
        )));
        let dispatcher = Dispatcher::new("http://backend", transport.clone(), store);

        dispatcher
            .dispatch(&ApiRequest::get("/api/lessons"))
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://backend/api/lessons");
        assert_eq!(sent[0].bearer_token(), Some("abc"));
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn sends_without_token_when_signed_out() {
        let transport = echo();
        let dispatcher = Dispatcher::new(
            "http://backend",
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
        );

        dispatcher
            .dispatch(&ApiRequest::get("/api/lessons"))
            .await
            .unwrap();

        assert_eq!(transport.requests()[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn encodes_query_and_body() {
        let transport = echo();
        let dispatcher = Dispatcher::new(
            "http://backend/",
            transport.clone(),
            Arc::new(MemoryCredentialStore::new()),
        );
        let request = ApiRequest::patch("/api/lessons/1/publish")
            .query("value", true)
            .json(&serde_json::json!({ "note": "a b" }))
            .unwrap();

        dispatcher.dispatch(&request).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "http://backend/api/lessons/1/publish?value=true");
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.body.as_deref(), Some(r#"{"note":"a b"}"#));
    }

    #[tokio::test]
    async fn returns_error_statuses_untouched() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(HttpResponse::new(401, "nope"))));
        let dispatcher = Dispatcher::new(
            "http://backend",
            transport,
            Arc::new(MemoryCredentialStore::new()),
        );

        let response = dispatcher
            .dispatch(&ApiRequest::get("/api/lessons"))
            .await
            .unwrap();
        assert_eq!(response.status, 401);
        assert!(settle(response).unwrap_err().is_unauthorized());
    }
}
