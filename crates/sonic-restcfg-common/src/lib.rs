//! Common infrastructure for SONiC openconfig configuration managers.
//!
//! This crate provides the shared pieces every REST-driven configuration
//! manager needs:
//!
//! - [`request`]: The [`Request`] model and safe path construction
//! - [`RestClient`]: The device client trait managers are written against
//! - [`http`]: A `reqwest` implementation of [`RestClient`]
//! - [`error`]: Error types for restcfg operations
//!
//! # Architecture
//!
//! Configuration managers follow this pattern:
//!
//! 1. Read the current configuration from the device (GET)
//! 2. Compute the ordered list of [`Request`]s that reach the desired state
//! 3. Dispatch them with [`RestClient::edit_config`], stopping at the first
//!    failure
//!
//! # Example
//!
//! ```ignore
//! use sonic_restcfg_common::{
//!     http::{HttpRestClient, TransportConfig},
//!     request::{interface_path, Request},
//!     RestClient, RestCfgResult,
//! };
//!
//! async fn disable(name: &str) -> RestCfgResult<()> {
//!     let client = HttpRestClient::new(TransportConfig::default())?;
//!     let req = Request::patch(
//!         interface_path(name, "/config/enabled"),
//!         serde_json::json!({"openconfig-interfaces:enabled": false}),
//!     );
//!     client.edit_config(&[req]).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod request;

// Re-export commonly used items at crate root
pub use client::RestClient;
pub use error::{RestCfgError, RestCfgResult};
pub use request::{Method, Request};
