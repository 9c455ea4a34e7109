//! Observed interface state, read from the openconfig interfaces tree.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;
use sonic_restcfg_common::request::INTERFACES_URL;
use sonic_restcfg_common::{Request, RestCfgError, RestClient};
use tracing::{instrument, warn};

use crate::error::IntfCfgResult;
use crate::ethernet::{FecMode, Speed};
use crate::types::{InterfaceList, InterfaceRecord};

#[derive(Debug, Default, Deserialize)]
struct OcRoot {
    #[serde(rename = "openconfig-interfaces:interfaces", default)]
    interfaces: OcInterfaces,
}

#[derive(Debug, Default, Deserialize)]
struct OcInterfaces {
    #[serde(default)]
    interface: Vec<OcInterface>,
}

#[derive(Debug, Deserialize)]
struct OcInterface {
    name: String,
    #[serde(default)]
    config: OcConfig,
    #[serde(rename = "openconfig-if-ethernet:ethernet", default)]
    ethernet: Option<OcEthernet>,
}

#[derive(Debug, Default, Deserialize)]
struct OcConfig {
    description: Option<String>,
    mtu: Option<u32>,
    enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OcEthernet {
    #[serde(default)]
    config: OcEthernetConfig,
}

#[derive(Debug, Default, Deserialize)]
struct OcEthernetConfig {
    #[serde(rename = "port-speed")]
    port_speed: Option<String>,
    #[serde(rename = "auto-negotiate")]
    auto_negotiate: Option<bool>,
    #[serde(rename = "openconfig-if-ethernet-ext2:advertised-speed")]
    advertised_speed: Option<String>,
    #[serde(rename = "openconfig-if-ethernet-ext2:port-fec")]
    port_fec: Option<String>,
}

impl OcInterface {
    fn into_record(self) -> InterfaceRecord {
        let mut record = InterfaceRecord::new(self.name);
        record.description = self.config.description;
        record.mtu = self.config.mtu;
        record.enabled = self.config.enabled;

        if let Some(eth) = self.ethernet.map(|e| e.config) {
            record.speed = eth.port_speed.as_deref().and_then(|s| {
                s.parse::<Speed>()
                    .map_err(|e| warn!(interface = %record.name, "Ignoring port speed: {}", e))
                    .ok()
            });
            record.fec = eth.port_fec.as_deref().and_then(|s| {
                s.parse::<FecMode>()
                    .map_err(|e| warn!(interface = %record.name, "Ignoring FEC: {}", e))
                    .ok()
            });
            record.auto_negotiate = eth.auto_negotiate;
            record.advertised_speed = eth.advertised_speed.as_deref().map(split_speeds);
        }

        record.without_illegal()
    }
}

fn split_speeds(speeds: &str) -> BTreeSet<String> {
    speeds
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses an openconfig interfaces document into observed records.
pub fn parse_interfaces(body: &Value) -> IntfCfgResult<InterfaceList> {
    let root = OcRoot::deserialize(body)
        .map_err(|e| RestCfgError::schema(INTERFACES_URL, e.to_string()))?;

    let records = root
        .interfaces
        .interface
        .into_iter()
        .map(OcInterface::into_record)
        .collect();
    InterfaceList::new(records)
}

/// Reads the observed interface list from the device.
#[instrument(skip_all)]
pub async fn get_interfaces_facts(client: &dyn RestClient) -> IntfCfgResult<InterfaceList> {
    let body = client.send(&Request::get(INTERFACES_URL)).await?;
    match body {
        Some(body) => parse_interfaces(&body),
        None => Ok(InterfaceList::default()),
    }
}
