//! End-to-end run: read facts, reconcile, dispatch and report.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sonic_restcfg_common::{Request, RestCfgError, RestCfgResult, RestClient};
use tracing::{error, info, instrument, warn};

use crate::error::IntfCfgResult;
use crate::facts;
use crate::intf_cfg::InterfacesConfig;
use crate::report::{config_diff, generate_config};
use crate::types::{Command, InterfaceKind, InterfaceList, State};

/// Options of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Requested reconciliation state.
    pub state: State,
    /// Compute and report without sending anything.
    pub check_mode: bool,
    /// Render a text diff of the before and after configuration.
    pub diff: bool,
}

impl RunOptions {
    pub fn new(state: State) -> Self {
        Self {
            state,
            check_mode: false,
            diff: false,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub changed: bool,
    pub commands: Vec<Command>,
    pub requests: Vec<Request>,
    pub before: InterfaceList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<InterfaceList>,
    #[serde(rename = "after(generated)", skip_serializing_if = "Option::is_none")]
    pub after_generated: Option<InterfaceList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_diff: Option<String>,
    pub warnings: Vec<String>,
}

/// A client for planning without a device: every request fails, so
/// default speeds fall back to `SPEED_DEFAULT`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineClient;

#[async_trait]
impl RestClient for OfflineClient {
    async fn send(&self, _request: &Request) -> RestCfgResult<Option<Value>> {
        Err(RestCfgError::connection(0, "Offline"))
    }
}

/// Drives a reconciliation against a device.
pub struct Runner<'a> {
    client: &'a dyn RestClient,
}

impl<'a> Runner<'a> {
    pub fn new(client: &'a dyn RestClient) -> Self {
        Self { client }
    }

    /// Reads the observed interfaces, without the management interface.
    pub async fn get_interfaces_facts(&self) -> IntfCfgResult<InterfaceList> {
        let mut list = facts::get_interfaces_facts(self.client).await?;
        list.retain(|r| r.kind() != InterfaceKind::Management);
        Ok(list)
    }

    /// Reads the observed interfaces from the device and runs against them.
    pub async fn run(
        &self,
        desired: &InterfaceList,
        options: &RunOptions,
    ) -> IntfCfgResult<RunResult> {
        let before = self.get_interfaces_facts().await?;
        self.run_with_facts(desired, before, options).await
    }

    /// Runs against an already known observed state.
    ///
    /// Requests are dispatched in order unless in check mode; the first
    /// failure aborts the rest and is returned.
    #[instrument(skip_all, fields(state = %options.state, check = options.check_mode))]
    pub async fn run_with_facts(
        &self,
        desired: &InterfaceList,
        mut before: InterfaceList,
        options: &RunOptions,
    ) -> IntfCfgResult<RunResult> {
        before.retain(|r| r.kind() != InterfaceKind::Management);

        let mut warnings = Vec::new();
        if options.state == State::Deleted {
            for want in desired.iter().filter(|w| !before.contains(&w.name)) {
                warnings.push(format!("Interface {} not found, nothing to delete", want.name));
            }
        }

        let reconciliation = InterfacesConfig::new(self.client)
            .reconcile(options.state, desired, &before)
            .await?;
        let changed = !reconciliation.commands.is_empty() && !reconciliation.requests.is_empty();

        let mut after = None;
        let mut after_generated = None;
        let mut new_config = before.clone();

        if changed {
            if options.check_mode {
                info!(
                    requests = reconciliation.requests.len(),
                    "Check mode, not sending requests"
                );
            } else {
                if let Err(e) = self.client.edit_config(&reconciliation.requests).await {
                    error!(code = ?e.code(), "Failed to apply configuration: {}", e);
                    return Err(e.into());
                }
                info!(
                    requests = reconciliation.requests.len(),
                    "Configuration applied"
                );
                let fetched = self.get_interfaces_facts().await?;
                new_config = fetched.clone();
                after = Some(fetched);
            }
        }

        if options.check_mode {
            let generated = generate_config(&reconciliation.commands, &before);
            new_config = generated.clone();
            after_generated = Some(generated);
        }

        let config_diff = options.diff.then(|| config_diff(&before, &new_config));

        for warning in &warnings {
            warn!("{}", warning);
        }

        before.sort_by_name();
        Ok(RunResult {
            changed,
            commands: reconciliation.commands,
            requests: reconciliation.requests,
            before,
            after,
            after_generated,
            config_diff,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterfaceRecord;

    #[tokio::test]
    async fn test_offline_client_fails_everything() {
        let err = OfflineClient
            .send(&Request::get("data/x"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(0));
    }

    #[tokio::test]
    async fn test_check_mode_with_offline_client() {
        let client = OfflineClient;
        let runner = Runner::new(&client);
        let before = InterfaceList::new(vec![InterfaceRecord::new("Ethernet0").with_mtu(9100)])
            .unwrap();
        let desired = InterfaceList::new(vec![InterfaceRecord::new("Ethernet0").with_mtu(1500)])
            .unwrap();
        let options = RunOptions {
            check_mode: true,
            diff: true,
            ..RunOptions::new(State::Merged)
        };

        let result = runner
            .run_with_facts(&desired, before, &options)
            .await
            .unwrap();

        assert!(result.changed);
        assert!(result.after.is_none());
        assert_eq!(
            result.after_generated.unwrap().into_vec(),
            vec![InterfaceRecord::new("Ethernet0").with_mtu(1500)]
        );
        assert!(result.config_diff.unwrap().contains("+    \"mtu\": 1500"));
    }

    #[tokio::test]
    async fn test_deleted_warns_on_unknown_interface() {
        let client = OfflineClient;
        let runner = Runner::new(&client);
        let desired = InterfaceList::new(vec![InterfaceRecord::new("Ethernet8")]).unwrap();
        let options = RunOptions {
            check_mode: true,
            ..RunOptions::new(State::Deleted)
        };

        let result = runner
            .run_with_facts(&desired, InterfaceList::default(), &options)
            .await
            .unwrap();

        assert!(!result.changed);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Ethernet8"));
    }
}
