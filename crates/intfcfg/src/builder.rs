//! Translation of one interface command into ordered device requests.
//!
//! Building is a fold over a snapshot of the command: every step takes the
//! current snapshot and the observed record and returns the next snapshot
//! with at most one request. The final snapshot is the state the interface
//! reaches once every produced request is applied.
//!
//! # Request order
//!
//! Create: loopback creation, common config, FEC, speed, auto-negotiate
//! with advertised speeds.
//!
//! Delete: a loopback is removed as a whole. Any other interface is reset
//! attribute by attribute: description, enabled, mtu, FEC, speed,
//! auto-negotiate, advertised speeds.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};
use sonic_restcfg_common::request::{ethernet_config_path, interface_path, INTERFACES_URL};
use sonic_restcfg_common::{Request, RestClient};
use tracing::{debug, instrument};

use crate::defaults::DefaultsResolver;
use crate::diff::{attribute_differs, is_static_default};
use crate::ethernet::{FecMode, Speed};
use crate::tables::{
    eth_fields, intf_fields, paths, OC_CONFIG, OC_ENABLED, OC_ETHERNET_CONFIG, OC_INTERFACES,
};
use crate::types::{Attribute, InterfaceRecord};

/// Whether a command is realized or reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Create,
    Delete,
}

/// The result of building one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    /// The command snapshot after every produced request.
    pub record: InterfaceRecord,
    /// Requests to send, in order.
    pub requests: Vec<Request>,
}

impl Built {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// One fold step: the next snapshot and at most one request.
type Step = (InterfaceRecord, Option<Request>);

fn push(requests: &mut Vec<Request>, (snapshot, request): Step) -> InterfaceRecord {
    requests.extend(request);
    snapshot
}

/// Builds device requests for interface commands.
pub struct RequestBuilder<'a> {
    resolver: DefaultsResolver<'a>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(client: &'a dyn RestClient) -> Self {
        Self {
            resolver: DefaultsResolver::new(client),
        }
    }

    pub fn resolver(&self) -> &DefaultsResolver<'a> {
        &self.resolver
    }

    /// Builds the requests realizing `command` in `direction` against
    /// `observed`, the interface's current record if it exists.
    #[instrument(skip(self, command, observed), fields(interface = %command.name))]
    pub async fn build(
        &self,
        direction: Direction,
        command: InterfaceRecord,
        observed: Option<&InterfaceRecord>,
    ) -> Built {
        let command = command.without_illegal();
        let built = match direction {
            Direction::Create => self.build_create(command, observed).await,
            Direction::Delete => self.build_delete(command, observed).await,
        };
        for request in &built.requests {
            debug!(%request, "Built request");
        }
        built
    }

    async fn build_create(
        &self,
        command: InterfaceRecord,
        observed: Option<&InterfaceRecord>,
    ) -> Built {
        let mut requests = Vec::new();

        let snapshot = push(&mut requests, create_loopback(command, observed));
        let snapshot = push(&mut requests, create_common_config(snapshot, observed));
        let snapshot = push(&mut requests, create_fec(snapshot, observed));
        let snapshot = push(&mut requests, self.create_speed(snapshot, observed).await);
        let record = push(&mut requests, create_autoneg(snapshot, observed));

        Built { record, requests }
    }

    async fn build_delete(
        &self,
        command: InterfaceRecord,
        observed: Option<&InterfaceRecord>,
    ) -> Built {
        let Some(have) = observed else {
            debug!("Interface not observed, nothing to delete");
            return Built {
                record: command,
                requests: Vec::new(),
            };
        };

        if command.kind().is_loopback() {
            let request = Request::delete(interface_path(command.name.as_str(), ""));
            return Built {
                record: command.name_only(),
                requests: vec![request],
            };
        }

        let mut requests = Vec::new();

        let snapshot = push(&mut requests, reset_description(command, have));
        let snapshot = push(&mut requests, reset_enabled(snapshot, have));
        let snapshot = push(&mut requests, reset_mtu(snapshot, have));
        let snapshot = push(&mut requests, reset_fec(snapshot, have));
        let snapshot = push(&mut requests, self.reset_speed(snapshot, have).await);
        let snapshot = push(&mut requests, reset_autoneg(snapshot, have));
        let record = push(&mut requests, reset_advertised_speed(snapshot, have));

        Built { record, requests }
    }

    /// Sets the target speed. `SPEED_DEFAULT` resets the port to its
    /// resolved hardware default and records that default in the snapshot.
    async fn create_speed(
        &self,
        mut snapshot: InterfaceRecord,
        observed: Option<&InterfaceRecord>,
    ) -> Step {
        let Some(target) = snapshot.speed else {
            return (snapshot, None);
        };
        let name = snapshot.name.as_str().to_string();
        let have = observed.and_then(|o| o.speed);

        if target == Speed::Default {
            let resolved = self.resolver.resolve_default_speed(&name).await;
            snapshot.speed = Some(resolved);
            if have == Some(resolved) {
                debug!(%resolved, "Speed already at default");
                return (snapshot, None);
            }
            let request = Request::delete(ethernet_config_path(&name, paths::PORT_SPEED));
            return (snapshot, Some(request));
        }

        if !attribute_differs(Attribute::Speed, &snapshot, observed) {
            return (snapshot, None);
        }

        let request = Request::patch(
            ethernet_config_path(&name, ""),
            json!({ OC_ETHERNET_CONFIG: { (eth_fields::PORT_SPEED): target.qualified() } }),
        );
        (snapshot, Some(request))
    }

    async fn reset_speed(&self, mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
        let (Some(_), Some(current)) = (snapshot.speed, have.speed) else {
            return (snapshot, None);
        };
        let name = snapshot.name.as_str().to_string();

        let resolved = self.resolver.resolve_default_speed(&name).await;
        if current == resolved {
            return (snapshot, None);
        }

        snapshot.speed = Some(resolved);
        let request = Request::delete(ethernet_config_path(&name, paths::PORT_SPEED));
        (snapshot, Some(request))
    }
}

fn create_loopback(snapshot: InterfaceRecord, observed: Option<&InterfaceRecord>) -> Step {
    if !snapshot.kind().is_loopback() || observed.is_some() {
        return (snapshot, None);
    }

    let name = snapshot.name.as_str();
    let request = Request::patch(
        INTERFACES_URL,
        json!({
            OC_INTERFACES: {
                (intf_fields::INTERFACE): [{
                    (intf_fields::NAME): name,
                    (intf_fields::CONFIG): { (intf_fields::NAME): name }
                }]
            }
        }),
    );
    (snapshot, Some(request))
}

fn create_common_config(snapshot: InterfaceRecord, observed: Option<&InterfaceRecord>) -> Step {
    if !snapshot.kind().has_common_attrs() {
        return (snapshot, None);
    }

    let mut config = Map::new();
    if attribute_differs(Attribute::Description, &snapshot, observed) {
        if let Some(description) = &snapshot.description {
            config.insert(intf_fields::DESCRIPTION.into(), Value::from(description.as_str()));
        }
    }
    if attribute_differs(Attribute::Enabled, &snapshot, observed) {
        if let Some(enabled) = snapshot.enabled {
            config.insert(intf_fields::ENABLED.into(), Value::from(enabled));
        }
    }
    if attribute_differs(Attribute::Mtu, &snapshot, observed) {
        if let Some(mtu) = snapshot.mtu {
            config.insert(intf_fields::MTU.into(), Value::from(mtu));
        }
    }

    if config.is_empty() {
        return (snapshot, None);
    }

    let request = Request::patch(
        interface_path(snapshot.name.as_str(), paths::CONFIG),
        json!({ OC_CONFIG: config }),
    );
    (snapshot, Some(request))
}

fn create_fec(snapshot: InterfaceRecord, observed: Option<&InterfaceRecord>) -> Step {
    let Some(fec) = snapshot.fec else {
        return (snapshot, None);
    };
    if !attribute_differs(Attribute::Fec, &snapshot, observed) {
        return (snapshot, None);
    }

    let request = Request::patch(
        ethernet_config_path(snapshot.name.as_str(), ""),
        json!({ OC_ETHERNET_CONFIG: { (eth_fields::PORT_FEC): fec.qualified() } }),
    );
    (snapshot, Some(request))
}

/// Auto-negotiate and advertised speeds share one request. Advertised
/// speeds are added to the observed set, never replacing it.
fn create_autoneg(mut snapshot: InterfaceRecord, observed: Option<&InterfaceRecord>) -> Step {
    if !snapshot.kind().is_physical() {
        return (snapshot, None);
    }

    let mut config = Map::new();
    if attribute_differs(Attribute::AutoNegotiate, &snapshot, observed) {
        if let Some(autoneg) = snapshot.auto_negotiate {
            config.insert(eth_fields::AUTO_NEGOTIATE.into(), Value::from(autoneg));
        }
    }

    if let Some(wanted) = &snapshot.advertised_speed {
        let current = observed
            .and_then(|o| o.advertised_speed.clone())
            .unwrap_or_default();
        let union: BTreeSet<String> = current.union(wanted).cloned().collect();
        if union != current {
            config.insert(
                eth_fields::ADVERTISED_SPEED.into(),
                Value::from(join_speeds(&union)),
            );
        }
        snapshot.advertised_speed = Some(union);
    }

    if config.is_empty() {
        return (snapshot, None);
    }

    let request = Request::patch(
        ethernet_config_path(snapshot.name.as_str(), ""),
        json!({ OC_ETHERNET_CONFIG: config }),
    );
    (snapshot, Some(request))
}

/// Whether the reset step for `attr` has work to do.
fn needs_reset(attr: Attribute, snapshot: &InterfaceRecord, have: &InterfaceRecord) -> bool {
    attr.applies_to(snapshot.kind()) && attr.is_set(snapshot) && !is_static_default(attr, have)
}

fn reset_description(mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
    if !needs_reset(Attribute::Description, &snapshot, have) {
        return (snapshot, None);
    }

    snapshot.description = Some(snapshot.kind().defaults().description.to_string());
    let request = Request::delete(interface_path(snapshot.name.as_str(), paths::DESCRIPTION));
    (snapshot, Some(request))
}

fn reset_enabled(mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
    if !needs_reset(Attribute::Enabled, &snapshot, have) {
        return (snapshot, None);
    }

    let enabled = snapshot.kind().defaults().enabled;
    snapshot.enabled = Some(enabled);
    let request = Request::patch(
        interface_path(snapshot.name.as_str(), paths::ENABLED),
        json!({ OC_ENABLED: enabled }),
    );
    (snapshot, Some(request))
}

fn reset_mtu(mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
    if !needs_reset(Attribute::Mtu, &snapshot, have) {
        return (snapshot, None);
    }

    snapshot.mtu = Some(snapshot.kind().defaults().mtu);
    let request = Request::delete(interface_path(snapshot.name.as_str(), paths::MTU));
    (snapshot, Some(request))
}

fn reset_fec(mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
    if !needs_reset(Attribute::Fec, &snapshot, have) {
        return (snapshot, None);
    }

    snapshot.fec = Some(FecMode::Disabled);
    let request = Request::patch(
        ethernet_config_path(snapshot.name.as_str(), paths::PORT_FEC),
        json!({ (eth_fields::PORT_FEC): FecMode::Disabled.as_str() }),
    );
    (snapshot, Some(request))
}

fn reset_autoneg(mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
    if !needs_reset(Attribute::AutoNegotiate, &snapshot, have) {
        return (snapshot, None);
    }

    snapshot.auto_negotiate = Some(false);
    let request = Request::delete(ethernet_config_path(
        snapshot.name.as_str(),
        paths::AUTO_NEGOTIATE,
    ));
    (snapshot, Some(request))
}

/// Revokes the command's advertised speeds. What remains of the observed
/// set is written back; an empty remainder removes the setting.
fn reset_advertised_speed(mut snapshot: InterfaceRecord, have: &InterfaceRecord) -> Step {
    if !needs_reset(Attribute::AdvertisedSpeed, &snapshot, have) {
        return (snapshot, None);
    }
    let (Some(revoked), Some(current)) = (&snapshot.advertised_speed, &have.advertised_speed)
    else {
        return (snapshot, None);
    };

    let remaining: BTreeSet<String> = current.difference(revoked).cloned().collect();
    if remaining.len() == current.len() {
        return (snapshot, None);
    }

    let path = ethernet_config_path(snapshot.name.as_str(), paths::ADVERTISED_SPEED);
    let request = if remaining.is_empty() {
        Request::delete(path)
    } else {
        Request::patch(
            path,
            json!({ (eth_fields::ADVERTISED_SPEED): join_speeds(&remaining) }),
        )
    };
    snapshot.advertised_speed = Some(remaining);
    (snapshot, Some(request))
}

fn join_speeds(speeds: &BTreeSet<String>) -> String {
    speeds.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
