//! In-memory transport for tests.
//!
//! Responses are registered per method and path and handed out in order;
//! every executed request is recorded so tests can assert on exactly which
//! Portainer calls an operation made. Stop requests run concurrently on the
//! create path, so responses are routed by path rather than a single queue.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method, TransportError};

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for requests matching `method` and URL path. Repeated
    /// calls for the same route queue further responses in order; the last
    /// queued response is replayed once the queue would run dry.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse { status, body });
    }

    /// Every request executed so far, in order of arrival.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of executed requests matching `method` and path.
    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let key = (request.method, request.url.path().to_string());
        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&key)
            .unwrap_or_else(|| panic!("no mock response for {:?} {}", request.method, request.url));
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| panic!("mock response queue drained for {:?} {}", request.method, request.url))
        };
        Ok(response)
    }
}
