//! Device client abstraction.
//!
//! The reconciliation logic never talks HTTP directly; it talks to a
//! [`RestClient`]. Production code uses [`crate::http::HttpRestClient`],
//! tests use a scripted mock.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RestCfgResult;
use crate::request::Request;

/// A client able to send REST requests to one device.
///
/// # Example
///
/// ```ignore
/// use sonic_restcfg_common::{RestClient, Request};
///
/// struct MyClient;
///
/// #[async_trait]
/// impl RestClient for MyClient {
///     async fn send(&self, request: &Request) -> RestCfgResult<Option<Value>> {
///         // ... perform the request
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Sends a single request.
    ///
    /// Returns the decoded JSON body, or `None` when the device answered
    /// without a body.
    async fn send(&self, request: &Request) -> RestCfgResult<Option<Value>>;

    /// Sends a batch of requests in order.
    ///
    /// Dispatch stops at the first failure and the error is returned; the
    /// requests after it are never sent. There are no retries.
    async fn edit_config(&self, requests: &[Request]) -> RestCfgResult<Vec<Option<Value>>> {
        let mut responses = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            debug!(index, request = %request, "Dispatching request");
            match self.send(request).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    warn!(
                        index,
                        request = %request,
                        remaining = requests.len() - index - 1,
                        "Request failed, aborting dispatch: {}",
                        e
                    );
                    return Err(e);
                }
            }
        }
        Ok(responses)
    }
}

#[async_trait]
impl<T: RestClient + ?Sized> RestClient for std::sync::Arc<T> {
    async fn send(&self, request: &Request) -> RestCfgResult<Option<Value>> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestCfgError;
    use std::sync::Mutex;

    /// Fails every request whose path contains `fail_on`.
    struct Recorder {
        fail_on: &'static str,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RestClient for Recorder {
        async fn send(&self, request: &Request) -> RestCfgResult<Option<Value>> {
            self.sent.lock().unwrap().push(request.path.clone());
            if request.path.contains(self.fail_on) {
                Err(RestCfgError::connection(500, "boom"))
            } else {
                Ok(None)
            }
        }
    }

    #[tokio::test]
    async fn test_edit_config_dispatches_in_order() {
        let client = Recorder {
            fail_on: "never",
            sent: Mutex::new(Vec::new()),
        };
        let reqs = vec![Request::delete("a"), Request::delete("b")];

        let responses = client.edit_config(&reqs).await.unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(*client.sent.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_edit_config_aborts_on_failure() {
        let client = Recorder {
            fail_on: "b",
            sent: Mutex::new(Vec::new()),
        };
        let reqs = vec![
            Request::delete("a"),
            Request::delete("b"),
            Request::delete("c"),
        ];

        let err = client.edit_config(&reqs).await.unwrap_err();

        assert_eq!(err.code(), Some(500));
        assert_eq!(*client.sent.lock().unwrap(), vec!["a", "b"]);
    }
}
