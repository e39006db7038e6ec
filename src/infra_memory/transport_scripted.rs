use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

/// In-process transport answering from a closure.
///
/// Every request is recorded before it is answered. Requests to a held path
/// wait until the test releases them, which makes interleavings such as
/// "three requests fail while the refresh call is still out" reproducible.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
    holds: DashMap<String, Arc<Semaphore>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            holds: DashMap::new(),
        }
    }

    /// Holds every request whose path ends with `path`. Each permit added to
    /// the returned semaphore lets one held request through.
    pub fn hold(&self, path: &str) -> Arc<Semaphore> {
        self.holds
            .entry(path.to_owned())
            .or_insert_with(|| Arc::new(Semaphore::new(0)))
            .value()
            .clone()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| path_of(&request.url).ends_with(path))
            .collect()
    }

    fn gate_for(&self, url: &str) -> Option<Arc<Semaphore>> {
        let path = path_of(url);
        self.holds
            .iter()
            .find(|entry| path.ends_with(entry.key().as_str()))
            .map(|entry| entry.value().clone())
    }
}

fn path_of(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(gate) = self.gate_for(&request.url) {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| TransportError::Other(e.to_string()))?;
            permit.forget();
        }

        (self.handler)(&request)
    }
}
