//! End-to-end reconciliation scenarios against a scripted device.

mod common;

use common::{list, ETH1};
use pretty_assertions::assert_eq;
use serde_json::json;
use sonic_intfcfg::{
    Command, FecMode, InterfaceList, InterfaceRecord, InterfacesConfig, Speed, State,
};
use sonic_restcfg_common::{Method, Request};
use sonic_restcfg_test::{MockRestClient, RequestVerifier};

#[tokio::test]
async fn test_delete_all_resets_ports_and_removes_loopbacks() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![
        InterfaceRecord::new("Ethernet1")
            .with_mtu(9100)
            .with_enabled(true)
            .with_fec(FecMode::Disabled),
        InterfaceRecord::new("Loopback0"),
    ]);

    let result = config
        .reconcile(State::Deleted, &InterfaceList::default(), &observed)
        .await
        .unwrap();

    assert_eq!(
        result.requests,
        vec![
            Request::patch(
                format!("{}/config/enabled", ETH1),
                json!({"openconfig-interfaces:enabled": false})
            ),
            Request::delete("data/openconfig-interfaces:interfaces/interface=Loopback0"),
        ]
    );
    assert_eq!(
        result.commands,
        vec![
            Command::new(
                InterfaceRecord::new("Ethernet1")
                    .with_mtu(9100)
                    .with_enabled(false)
                    .with_fec(FecMode::Disabled),
                State::Merged
            ),
            Command::new(InterfaceRecord::new("Loopback0"), State::Deleted),
        ]
    );
}

#[tokio::test]
async fn test_merge_writes_only_differing_description() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![InterfaceRecord::new("Ethernet1")
        .with_description("")
        .with_mtu(9100)]);
    let desired = list(vec![InterfaceRecord::new("Ethernet1")
        .with_description("uplink")
        .with_mtu(9100)]);

    let result = config
        .reconcile(State::Merged, &desired, &observed)
        .await
        .unwrap();

    assert_eq!(
        result.requests,
        vec![Request::patch(
            format!("{}/config", ETH1),
            json!({"openconfig-interfaces:config": {"description": "uplink"}})
        )]
    );
    assert_eq!(result.commands.len(), 1);
    assert_eq!(result.commands[0].state, State::Merged);
}

#[tokio::test]
async fn test_equal_state_is_a_no_op_in_every_mode() {
    let mock = MockRestClient::new().with_valid_speeds("Ethernet2", "10000,100000");
    let config = InterfacesConfig::new(&mock);
    let ethernet1 = InterfaceRecord::new("Ethernet1")
        .with_mtu(9000)
        .with_enabled(true)
        .with_auto_negotiate(true)
        .with_advertised_speed(["10000", "40000"]);
    let observed = list(vec![
        ethernet1.clone(),
        InterfaceRecord::new("Ethernet2")
            .with_mtu(1500)
            .with_speed(Speed::Speed100Gb),
        InterfaceRecord::new("Loopback0"),
    ]);
    let desired = list(vec![
        ethernet1,
        InterfaceRecord::new("Ethernet2")
            .with_mtu(1500)
            .with_speed(Speed::Default),
        InterfaceRecord::new("Loopback0"),
    ]);

    for state in [State::Merged, State::Replaced, State::Overridden] {
        let result = config.reconcile(state, &desired, &observed).await.unwrap();
        assert!(result.is_empty(), "{} produced {:?}", state, result.requests);
        assert!(result.commands.is_empty());
    }
}

#[tokio::test]
async fn test_loopback_only_created_or_removed_whole() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let desired = list(vec![InterfaceRecord::new("Loopback5")
        .with_mtu(1500)
        .with_description("router-id")]);

    let result = config
        .reconcile(State::Merged, &desired, &InterfaceList::default())
        .await
        .unwrap();

    let verifier = RequestVerifier::new(&result.requests);
    verifier.assert_count(1).unwrap();
    let create = verifier
        .assert_request(Method::Patch, "openconfig-interfaces:interfaces")
        .unwrap();
    assert_eq!(
        create.data,
        Some(json!({
            "openconfig-interfaces:interfaces": {
                "interface": [{"name": "Loopback5", "config": {"name": "Loopback5"}}]
            }
        }))
    );
    assert_eq!(result.commands[0].record, InterfaceRecord::new("Loopback5"));
}

#[tokio::test]
async fn test_link_attributes_ignored_on_port_channels() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![InterfaceRecord::new("PortChannel1").with_mtu(9100)]);
    let desired = list(vec![InterfaceRecord::new("PortChannel1")
        .with_speed(Speed::Speed100Gb)
        .with_fec(FecMode::Rs)]);

    let result = config
        .reconcile(State::Merged, &desired, &observed)
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(result.commands.is_empty());
}

#[tokio::test]
async fn test_merge_advertised_speeds_are_united() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![InterfaceRecord::new("Ethernet1").with_advertised_speed(["40000"])]);
    let desired = list(vec![InterfaceRecord::new("Ethernet1")
        .with_auto_negotiate(true)
        .with_advertised_speed(["10000"])]);

    let result = config
        .reconcile(State::Merged, &desired, &observed)
        .await
        .unwrap();

    assert_eq!(
        result.requests,
        vec![Request::patch(
            format!("{}/openconfig-if-ethernet:ethernet/config", ETH1),
            json!({
                "openconfig-if-ethernet:config": {
                    "auto-negotiate": true,
                    "openconfig-if-ethernet-ext2:advertised-speed": "10000,40000"
                }
            })
        )]
    );
    assert_eq!(
        result.commands[0].record.advertised_speed,
        Some(["10000", "40000"].into_iter().map(String::from).collect())
    );
}

#[tokio::test]
async fn test_named_delete_revokes_every_advertised_speed() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![
        InterfaceRecord::new("Ethernet1").with_advertised_speed(["10000", "25000", "40000"])
    ]);
    let desired = list(vec![
        InterfaceRecord::new("Ethernet1").with_advertised_speed(["25000"])
    ]);

    let result = config
        .reconcile(State::Deleted, &desired, &observed)
        .await
        .unwrap();

    // Named deletion resets every observed attribute.
    assert_eq!(
        result.requests,
        vec![Request::delete(format!(
            "{}/openconfig-if-ethernet:ethernet/config/openconfig-if-ethernet-ext2:advertised-speed",
            ETH1
        ))]
    );
}

#[tokio::test]
async fn test_replaced_removals_precede_creates() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![
        InterfaceRecord::new("Ethernet1").with_mtu(1500),
        InterfaceRecord::new("Ethernet2").with_description("old"),
    ]);
    let desired = list(vec![
        InterfaceRecord::new("Loopback1"),
        InterfaceRecord::new("Ethernet1").with_mtu(9000),
        InterfaceRecord::new("Ethernet2").with_description("new"),
    ]);

    let result = config
        .reconcile(State::Replaced, &desired, &observed)
        .await
        .unwrap();

    let verifier = RequestVerifier::new(&result.requests);
    verifier
        .assert_ordered(|r| r.method == Method::Delete, |r| r.method == Method::Patch)
        .unwrap();
    verifier.assert_request(Method::Delete, "Ethernet1/config/mtu").unwrap();
    verifier
        .assert_request(Method::Delete, "Ethernet2/config/description")
        .unwrap();
    verifier.assert_count(5).unwrap();
    assert!(result.commands.iter().all(|c| c.state == State::Replaced));
}

#[tokio::test]
async fn test_default_speed_resolved_from_device() {
    let mock = MockRestClient::new().with_valid_speeds("Ethernet1", "10000,25000");
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![InterfaceRecord::new("Ethernet1").with_speed(Speed::Speed10Gb)]);
    let desired = list(vec![InterfaceRecord::new("Ethernet1").with_speed(Speed::Default)]);

    let result = config
        .reconcile(State::Merged, &desired, &observed)
        .await
        .unwrap();

    assert_eq!(
        result.requests,
        vec![Request::delete(format!(
            "{}/openconfig-if-ethernet:ethernet/config/port-speed",
            ETH1
        ))]
    );
    assert_eq!(result.commands[0].record.speed, Some(Speed::Speed25Gb));
}

#[tokio::test]
async fn test_default_speed_falls_back_when_device_silent() {
    let mock = MockRestClient::new().with_failure("sonic-port", 500, "Internal error");
    let config = InterfacesConfig::new(&mock);
    let observed = list(vec![InterfaceRecord::new("Ethernet1")
        .with_speed(Speed::Speed10Gb)
        .with_mtu(1500)]);

    let result = config
        .reconcile(State::Deleted, &InterfaceList::default(), &observed)
        .await
        .unwrap();

    let verifier = RequestVerifier::new(&result.requests);
    verifier.assert_count(2).unwrap();
    verifier.assert_request(Method::Delete, "/config/mtu").unwrap();
    verifier.assert_request(Method::Delete, "/port-speed").unwrap();
    assert_eq!(result.commands[0].record.speed, Some(Speed::Default));
}

#[tokio::test]
async fn test_names_with_slashes_are_escaped() {
    let mock = MockRestClient::new();
    let config = InterfacesConfig::new(&mock);
    let desired = list(vec![InterfaceRecord::new("eth1/1").with_mtu(9000)]);

    let result = config
        .reconcile(State::Merged, &desired, &InterfaceList::default())
        .await
        .unwrap();

    assert_eq!(
        result.requests[0].path,
        "data/openconfig-interfaces:interfaces/interface=Eth1%2F1/config"
    );
    assert_eq!(result.commands[0].name().as_str(), "Eth1/1");
}
