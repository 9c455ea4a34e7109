//! REST request model and path construction utilities.
//!
//! Every change to the device is expressed as a [`Request`]: a path relative
//! to the RESTCONF root, a [`Method`] and an optional JSON payload. Interface
//! names are embedded in paths, so they are percent-escaped with no safe
//! characters (`Ethernet1/1` becomes `Ethernet1%2F1`).
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sonic_restcfg_common::request::{interface_path, Method, Request};
//!
//! let req = Request::patch(
//!     interface_path("Ethernet0", "/config"),
//!     json!({"openconfig-interfaces:config": {"mtu": 9100}}),
//! );
//! assert_eq!(req.method, Method::Patch);
//! assert_eq!(req.path, "data/openconfig-interfaces:interfaces/interface=Ethernet0/config");
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of the openconfig interfaces tree.
pub const INTERFACES_URL: &str = "data/openconfig-interfaces:interfaces";

/// Prefix of a single interface resource; the escaped name follows.
pub const INTERFACE_URL: &str = "data/openconfig-interfaces:interfaces/interface=";

/// Ethernet configuration container below an interface resource.
pub const ETHERNET_CONFIG_SUFFIX: &str = "/openconfig-if-ethernet:ethernet/config";

/// Prefix of a SONiC port table entry; the escaped name follows.
pub const SONIC_PORT_URL: &str = "data/sonic-port:sonic-port/PORT/PORT_LIST=";

/// Characters that must be escaped in a path segment.
/// Matches everything outside the RFC 3986 unreserved set.
static PATH_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.~\-]").expect("Invalid regex pattern"));

/// Percent-escapes a string for use as a single path segment.
///
/// No character is treated as safe, so `/` is escaped too.
///
/// # Example
///
/// ```
/// use sonic_restcfg_common::request::quote;
///
/// assert_eq!(quote("Ethernet0"), "Ethernet0");
/// assert_eq!(quote("Eth1/1"), "Eth1%2F1");
/// assert_eq!(quote("a b"), "a%20b");
/// ```
pub fn quote(s: &str) -> String {
    PATH_ESCAPE_RE
        .replace_all(s, |caps: &Captures| {
            caps[0]
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>()
        })
        .into_owned()
}

/// Builds the path of an interface resource with an optional suffix.
///
/// The suffix is appended verbatim and must start with `/` when non-empty.
pub fn interface_path(name: &str, suffix: &str) -> String {
    format!("{}{}{}", INTERFACE_URL, quote(name), suffix)
}

/// Builds the path of an interface's ethernet config container with an
/// optional suffix.
pub fn ethernet_config_path(name: &str, suffix: &str) -> String {
    format!(
        "{}{}{}{}",
        INTERFACE_URL,
        quote(name),
        ETHERNET_CONFIG_SUFFIX,
        suffix
    )
}

/// Builds the path of a SONiC port table entry with an optional suffix.
pub fn sonic_port_path(name: &str, suffix: &str) -> String {
    format!("{}{}{}", SONIC_PORT_URL, quote(name), suffix)
}

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Read a resource.
    Get,
    /// Merge a payload into a resource.
    Patch,
    /// Remove a resource (or reset a leaf to its default).
    Delete,
}

impl Method {
    /// Returns the method name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single REST request against the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Path relative to the RESTCONF root.
    pub path: String,
    /// HTTP method.
    pub method: Method,
    /// JSON payload, for PATCH requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Request {
    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
            data: None,
        }
    }

    /// Creates a PATCH request with a payload.
    pub fn patch(path: impl Into<String>, data: Value) -> Self {
        Self {
            path: path.into(),
            method: Method::Patch,
            data: Some(data),
        }
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Delete,
            data: None,
        }
    }

    /// Returns true if the request modifies the device.
    pub fn is_mutation(&self) -> bool {
        self.method != Method::Get
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
