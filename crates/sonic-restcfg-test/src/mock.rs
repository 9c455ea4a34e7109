//! Scripted in-memory device client
//!
//! GET requests are answered from scripted responses keyed by path; PATCH and
//! DELETE requests succeed and are only captured. Failures can be injected
//! for any path fragment, or for every request to simulate a device outage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use sonic_restcfg_common::request::sonic_port_path;
use sonic_restcfg_common::{Method, Request, RestCfgError, RestCfgResult, RestClient};

/// An injected failure.
#[derive(Debug, Clone)]
struct Failure {
    fragment: String,
    code: u16,
    message: String,
}

/// In-memory [`RestClient`] for tests.
#[derive(Debug, Default)]
pub struct MockRestClient {
    responses: HashMap<String, Value>,
    failures: Vec<Failure>,
    offline: bool,
    sent: Mutex<Vec<Request>>,
}

impl MockRestClient {
    /// Create a mock with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GET requests for `path` with `body`
    pub fn with_response(mut self, path: impl Into<String>, body: Value) -> Self {
        self.responses.insert(path.into(), body);
        self
    }

    /// Script the `valid_speeds` answer of a SONiC port entry
    pub fn with_valid_speeds(self, port: &str, speeds: &str) -> Self {
        self.with_response(
            sonic_port_path(port, "/valid_speeds"),
            json!({ "sonic-port:valid_speeds": speeds }),
        )
    }

    /// Fail every request whose path contains `fragment`
    pub fn with_failure(
        mut self,
        fragment: impl Into<String>,
        code: u16,
        message: impl Into<String>,
    ) -> Self {
        self.failures.push(Failure {
            fragment: fragment.into(),
            code,
            message: message.into(),
        });
        self
    }

    /// Fail every request, as if the device were unreachable
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// All requests received so far, in order
    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().expect("mock state poisoned").clone()
    }

    /// Requests received so far that modify the device
    pub fn sent_mutations(&self) -> Vec<Request> {
        self.sent()
            .into_iter()
            .filter(Request::is_mutation)
            .collect()
    }

    /// Forget captured requests
    pub fn clear(&self) {
        self.sent.lock().expect("mock state poisoned").clear();
    }
}

#[async_trait]
impl RestClient for MockRestClient {
    async fn send(&self, request: &Request) -> RestCfgResult<Option<Value>> {
        self.sent
            .lock()
            .expect("mock state poisoned")
            .push(request.clone());

        if self.offline {
            return Err(RestCfgError::connection(0, "Connection refused"));
        }

        if let Some(failure) = self
            .failures
            .iter()
            .find(|f| request.path.contains(&f.fragment))
        {
            return Err(RestCfgError::connection(
                failure.code,
                failure.message.clone(),
            ));
        }

        match request.method {
            Method::Get => self
                .responses
                .get(&request.path)
                .cloned()
                .map(Some)
                .ok_or_else(|| RestCfgError::connection(404, "Resource not found")),
            Method::Patch | Method::Delete => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_get() {
        let mock = MockRestClient::new().with_valid_speeds("Ethernet0", "10000,40000");

        let body = mock
            .send(&Request::get(sonic_port_path("Ethernet0", "/valid_speeds")))
            .await
            .unwrap();

        assert_eq!(body, Some(json!({"sonic-port:valid_speeds": "10000,40000"})));
    }

    #[tokio::test]
    async fn test_unscripted_get_is_not_found() {
        let mock = MockRestClient::new();

        let err = mock.send(&Request::get("data/x")).await.unwrap_err();

        assert_eq!(err.code(), Some(404));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mock = MockRestClient::new().with_failure("Ethernet8", 500, "boom");

        assert!(mock.send(&Request::delete("a/Ethernet0")).await.is_ok());
        assert!(mock.send(&Request::delete("a/Ethernet8")).await.is_err());
        assert_eq!(mock.sent_mutations().len(), 2);
    }

    #[tokio::test]
    async fn test_offline() {
        let mock = MockRestClient::new().offline();

        let err = mock.send(&Request::delete("a")).await.unwrap_err();

        assert_eq!(err.code(), Some(0));
    }
}
