//! Interface configuration reconciler for SONiC.
//!
//! This crate reconciles the interfaces of a SONiC device, reached through
//! its openconfig REST interface, with an operator supplied desired state.
//!
//! # Responsibilities
//!
//! - Compute the ordered requests realizing a desired interface list under
//!   one of four states: merged, replaced, overridden, deleted
//! - Respect per-kind rules: physical ports own link attributes, loopbacks
//!   are created and removed whole, the management port is never touched
//! - Resolve hardware-dependent defaults (port speed) from the device
//! - Report the commands applied and the predicted or observed outcome
//!
//! # Interface kinds
//!
//! | Kind | Names | Attributes |
//! |------|-------|------------|
//! | Physical | `Eth*` | description, enabled, mtu, speed, auto_negotiate, advertised_speed, fec |
//! | Loopback | `Loopback*` | none (whole resource) |
//! | Management | `Management*` | excluded |
//! | Other | anything else | description, enabled, mtu |
//!
//! # Example
//!
//! ```ignore
//! use sonic_intfcfg::{InterfacesConfig, InterfaceList, State};
//!
//! let config = InterfacesConfig::new(&client);
//! let plan = config.reconcile(State::Replaced, &desired, &observed).await?;
//! client.edit_config(&plan.requests).await?;
//! ```

pub mod builder;
pub mod classify;
pub mod config;
pub mod defaults;
pub mod diff;
mod error;
pub mod ethernet;
pub mod facts;
mod intf_cfg;
pub mod report;
mod runner;
mod tables;
mod types;

pub use builder::{Built, Direction, RequestBuilder};
pub use defaults::{DefaultsResolver, Unresolved};
pub use error::{IntfCfgError, IntfCfgResult};
pub use ethernet::{FecMode, Speed};
pub use intf_cfg::{InterfacesConfig, Reconciliation};
pub use runner::{OfflineClient, RunOptions, RunResult, Runner};
pub use tables::*;
pub use types::*;
