//! Hardware-dependent default resolution.
//!
//! A port's default speed is the highest rate in its `valid_speeds` list.
//! Resolution is best effort: when the device cannot answer, the caller
//! gets [`Speed::Default`] and reconciliation of other attributes goes on.

use serde_json::Value;
use sonic_restcfg_common::request::sonic_port_path;
use sonic_restcfg_common::{Request, RestCfgError, RestClient};
use thiserror::Error;
use tracing::debug;

use crate::ethernet::Speed;
use crate::tables::{paths, SONIC_VALID_SPEEDS};

/// Why a default speed could not be resolved.
#[derive(Debug, Error)]
pub enum Unresolved {
    #[error("valid speeds query failed: {0}")]
    Query(#[from] RestCfgError),

    #[error("response has no 'sonic-port:valid_speeds' leaf")]
    MissingField,

    #[error("valid speeds list is empty")]
    Empty,

    #[error("invalid speed '{value}' in valid speeds list")]
    InvalidSpeed { value: String },

    #[error("no speed identity for {mbps} Mbps")]
    Unmapped { mbps: u32 },
}

/// Resolves device defaults through a [`RestClient`].
///
/// Every call issues one query; nothing is cached.
pub struct DefaultsResolver<'a> {
    client: &'a dyn RestClient,
}

impl<'a> DefaultsResolver<'a> {
    pub fn new(client: &'a dyn RestClient) -> Self {
        Self { client }
    }

    /// Resolves the default speed of `name`, reporting why it failed.
    pub async fn try_resolve_default_speed(&self, name: &str) -> Result<Speed, Unresolved> {
        let request = Request::get(sonic_port_path(name, paths::VALID_SPEEDS));
        let body = self.client.send(&request).await?;
        let speeds = body
            .as_ref()
            .and_then(|b| b.get(SONIC_VALID_SPEEDS))
            .and_then(Value::as_str)
            .ok_or(Unresolved::MissingField)?;

        let max = parse_valid_speeds(speeds)?
            .into_iter()
            .max()
            .ok_or(Unresolved::Empty)?;

        Speed::from_mbps(max).ok_or(Unresolved::Unmapped { mbps: max })
    }

    /// Resolves the default speed of `name`, falling back to
    /// [`Speed::Default`] on any failure.
    pub async fn resolve_default_speed(&self, name: &str) -> Speed {
        match self.try_resolve_default_speed(name).await {
            Ok(speed) => {
                debug!(interface = name, %speed, "Resolved default speed");
                speed
            }
            Err(e) => {
                debug!(interface = name, error = %e, "Default speed unresolved, using SPEED_DEFAULT");
                Speed::Default
            }
        }
    }
}

/// Parses a comma separated list of Mbps rates.
pub fn parse_valid_speeds(speeds: &str) -> Result<Vec<u32>, Unresolved> {
    speeds
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| Unresolved::InvalidSpeed {
                value: s.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sonic_restcfg_test::MockRestClient;

    #[test]
    fn test_parse_valid_speeds() {
        assert_eq!(parse_valid_speeds("10000,40000").unwrap(), vec![10000, 40000]);
        assert_eq!(parse_valid_speeds(" 1000 , 25000 ").unwrap(), vec![1000, 25000]);
        assert!(parse_valid_speeds("").unwrap().is_empty());
        assert!(matches!(
            parse_valid_speeds("10000,fast"),
            Err(Unresolved::InvalidSpeed { value }) if value == "fast"
        ));
    }

    #[tokio::test]
    async fn test_resolve_takes_maximum() {
        let mock = MockRestClient::new().with_valid_speeds("Ethernet0", "10000,100000,40000");
        let resolver = DefaultsResolver::new(&mock);

        assert_eq!(
            resolver.resolve_default_speed("Ethernet0").await,
            Speed::Speed100Gb
        );
        assert_eq!(mock.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_escapes_name() {
        let mock = MockRestClient::new().with_valid_speeds("Eth1/1", "25000");
        let resolver = DefaultsResolver::new(&mock);

        assert_eq!(resolver.resolve_default_speed("Eth1/1").await, Speed::Speed25Gb);
        assert!(mock.sent()[0].path.ends_with("PORT_LIST=Eth1%2F1/valid_speeds"));
    }

    #[tokio::test]
    async fn test_query_failure_falls_back() {
        let mock = MockRestClient::new().offline();
        let resolver = DefaultsResolver::new(&mock);

        assert!(matches!(
            resolver.try_resolve_default_speed("Ethernet0").await,
            Err(Unresolved::Query(_))
        ));
        assert_eq!(resolver.resolve_default_speed("Ethernet0").await, Speed::Default);
    }

    #[tokio::test]
    async fn test_malformed_responses_fall_back() {
        let mock = MockRestClient::new()
            .with_response(
                sonic_port_path("Ethernet0", paths::VALID_SPEEDS),
                json!({"unexpected": 1}),
            )
            .with_valid_speeds("Ethernet4", "10000,abc")
            .with_valid_speeds("Ethernet8", "12345")
            .with_valid_speeds("Ethernet12", "");
        let resolver = DefaultsResolver::new(&mock);

        assert!(matches!(
            resolver.try_resolve_default_speed("Ethernet0").await,
            Err(Unresolved::MissingField)
        ));
        assert!(matches!(
            resolver.try_resolve_default_speed("Ethernet4").await,
            Err(Unresolved::InvalidSpeed { .. })
        ));
        assert!(matches!(
            resolver.try_resolve_default_speed("Ethernet8").await,
            Err(Unresolved::Unmapped { mbps: 12345 })
        ));
        assert!(matches!(
            resolver.try_resolve_default_speed("Ethernet12").await,
            Err(Unresolved::Empty)
        ));
        assert_eq!(resolver.resolve_default_speed("Ethernet8").await, Speed::Default);
    }
}
