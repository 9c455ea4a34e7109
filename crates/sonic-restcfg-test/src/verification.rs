//! Verification helpers for testing configuration managers
//!
//! Provides assertion helpers over a produced or dispatched request list

use sonic_restcfg_common::{Method, Request};
use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected {method} request ending with '{suffix}', got {actual:?}")]
    RequestNotFound {
        method: Method,
        suffix: String,
        actual: Vec<String>,
    },

    #[error("Unexpected request matching '{fragment}': {request}")]
    UnexpectedRequest { fragment: String, request: String },

    #[error("Expected {expected} requests, found {actual}: {requests:?}")]
    CountMismatch {
        expected: usize,
        actual: usize,
        requests: Vec<String>,
    },

    #[error("Request #{later} ({later_request}) must come after request #{earlier} ({earlier_request})")]
    OrderViolation {
        earlier: usize,
        earlier_request: String,
        later: usize,
        later_request: String,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Request list verifier
pub struct RequestVerifier<'a> {
    requests: &'a [Request],
}

impl<'a> RequestVerifier<'a> {
    /// Create a new request verifier
    pub fn new(requests: &'a [Request]) -> Self {
        Self { requests }
    }

    fn rendered(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.to_string()).collect()
    }

    /// Find the first request with `method` whose path ends with `suffix`
    pub fn find(&self, method: Method, suffix: &str) -> Option<&'a Request> {
        self.requests
            .iter()
            .find(|r| r.method == method && r.path.ends_with(suffix))
    }

    /// Verify that a request with `method` and a path ending in `suffix` exists
    pub fn assert_request(&self, method: Method, suffix: &str) -> VerifyResult<&'a Request> {
        self.find(method, suffix)
            .ok_or_else(|| VerificationError::RequestNotFound {
                method,
                suffix: suffix.to_string(),
                actual: self.rendered(),
            })
    }

    /// Verify that no request path contains `fragment`
    pub fn assert_not_requested(&self, fragment: &str) -> VerifyResult<()> {
        match self.requests.iter().find(|r| r.path.contains(fragment)) {
            Some(request) => Err(VerificationError::UnexpectedRequest {
                fragment: fragment.to_string(),
                request: request.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Verify the number of requests
    pub fn assert_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.requests.len();
        if actual != expected {
            Err(VerificationError::CountMismatch {
                expected,
                actual,
                requests: self.rendered(),
            })
        } else {
            Ok(())
        }
    }

    /// Verify that every request matching `first` precedes every request
    /// matching `then`
    pub fn assert_ordered<F, G>(&self, first: F, then: G) -> VerifyResult<()>
    where
        F: Fn(&Request) -> bool,
        G: Fn(&Request) -> bool,
    {
        let last_first = self.requests.iter().rposition(|r| first(r));
        let first_then = self.requests.iter().position(|r| then(r));

        match (last_first, first_then) {
            (Some(earlier), Some(later)) if later < earlier => {
                Err(VerificationError::OrderViolation {
                    earlier,
                    earlier_request: self.requests[earlier].to_string(),
                    later,
                    later_request: self.requests[later].to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Get all requests
    pub fn requests(&self) -> &'a [Request] {
        self.requests
    }
}
