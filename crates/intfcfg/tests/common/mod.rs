//! Shared fixtures for intfcfg integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use sonic_intfcfg::{InterfaceList, InterfaceRecord};

pub const ETH1: &str = "data/openconfig-interfaces:interfaces/interface=Ethernet1";

/// Builds an interface list, panicking on duplicate names.
pub fn list(records: Vec<InterfaceRecord>) -> InterfaceList {
    InterfaceList::new(records).expect("duplicate interface in fixture")
}

/// Renders records as the openconfig interfaces document a device returns.
pub fn openconfig_doc(records: &[InterfaceRecord]) -> Value {
    let interfaces: Vec<Value> = records
        .iter()
        .map(|r| {
            let mut config = json!({ "name": r.name.as_str() });
            if let Some(description) = &r.description {
                config["description"] = json!(description);
            }
            if let Some(mtu) = r.mtu {
                config["mtu"] = json!(mtu);
            }
            if let Some(enabled) = r.enabled {
                config["enabled"] = json!(enabled);
            }

            let mut eth = json!({});
            if let Some(speed) = r.speed {
                eth["port-speed"] = json!(speed.qualified());
            }
            if let Some(autoneg) = r.auto_negotiate {
                eth["auto-negotiate"] = json!(autoneg);
            }
            if let Some(adv) = &r.advertised_speed {
                let joined: Vec<&str> = adv.iter().map(String::as_str).collect();
                eth["openconfig-if-ethernet-ext2:advertised-speed"] = json!(joined.join(","));
            }
            if let Some(fec) = r.fec {
                eth["openconfig-if-ethernet-ext2:port-fec"] = json!(fec.qualified());
            }

            let mut entry = json!({ "name": r.name.as_str(), "config": config });
            if eth.as_object().is_some_and(|o| !o.is_empty()) {
                entry["openconfig-if-ethernet:ethernet"] = json!({ "config": eth });
            }
            entry
        })
        .collect();

    json!({ "openconfig-interfaces:interfaces": { "interface": interfaces } })
}
