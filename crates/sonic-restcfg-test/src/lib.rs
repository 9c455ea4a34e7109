//! Test infrastructure for SONiC REST configuration managers
//!
//! Provides:
//! - A scripted in-memory device client
//! - Failure injection for connectivity scenarios
//! - Request-list verification helpers

pub mod mock;
mod verification;

pub use mock::MockRestClient;
pub use verification::*;
