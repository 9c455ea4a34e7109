//! Interface reconciliation for the four configuration states.
//!
//! [`InterfacesConfig::reconcile`] turns a desired and an observed
//! interface list into the commands to report and the requests that
//! realize them:
//!
//! - `merged` adds and modifies attributes, never removes anything.
//! - `replaced` resets each changed interface before writing the desired
//!   attributes.
//! - `overridden` additionally resets every physical port the desired list
//!   does not mention.
//! - `deleted` resets (or, for loopbacks, removes) the named interfaces, or
//!   every observed interface when nothing is named.
//!
//! In `replaced` and `overridden`, every reset and removal request precedes
//! every create request.

use sonic_restcfg_common::{Request, RestClient};
use tracing::{debug, info, instrument};

use crate::builder::{Built, Direction, RequestBuilder};
use crate::classify::{classify_delete_outcome, classify_for_deletion, delete_outcome};
use crate::diff::{diff_with_defaults, is_change_required_with_defaults, is_this_delete_required};
use crate::error::{IntfCfgError, IntfCfgResult};
use crate::types::{Command, InterfaceKind, InterfaceList, InterfaceRecord, State};

/// Commands and requests of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub commands: Vec<Command>,
    pub requests: Vec<Request>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Records a built command; commands without requests are dropped.
    fn push(&mut self, built: Built, state: State) {
        if built.is_empty() {
            debug!(interface = %built.record.name, "No request needed");
            return;
        }
        self.requests.extend(built.requests);
        self.commands.push(Command::new(built.record, state));
    }
}

/// Interface reconciler.
pub struct InterfacesConfig<'a> {
    builder: RequestBuilder<'a>,
}

impl<'a> InterfacesConfig<'a> {
    /// Creates a reconciler. The client is only used for default speed
    /// queries; nothing is written to the device.
    pub fn new(client: &'a dyn RestClient) -> Self {
        Self {
            builder: RequestBuilder::new(client),
        }
    }

    /// Computes the commands and ordered requests that move `observed` to
    /// `desired` under `state`.
    ///
    /// Fails before producing anything when `desired` names the management
    /// interface. The management interface is ignored in `observed`.
    #[instrument(skip_all, fields(%state))]
    pub async fn reconcile(
        &self,
        state: State,
        desired: &InterfaceList,
        observed: &InterfaceList,
    ) -> IntfCfgResult<Reconciliation> {
        if let Some(mgmt) = desired
            .iter()
            .find(|r| r.kind() == InterfaceKind::Management)
        {
            return Err(IntfCfgError::ManagementInterface {
                name: mgmt.name.to_string(),
            });
        }

        let mut observed = observed.clone();
        observed.retain(|r| r.kind() != InterfaceKind::Management);

        let result = match state {
            State::Merged => self.merged(desired, &observed).await,
            State::Replaced => self.replaced(desired, &observed).await,
            State::Overridden => self.overridden(desired, &observed).await,
            State::Deleted => self.deleted(desired, &observed).await,
        };

        info!(
            commands = result.commands.len(),
            requests = result.requests.len(),
            "Reconciliation computed"
        );
        Ok(result)
    }

    async fn merged(&self, desired: &InterfaceList, observed: &InterfaceList) -> Reconciliation {
        let mut result = Reconciliation::default();
        let changed = diff_with_defaults(desired, observed, self.builder.resolver()).await;
        self.create_all(changed, observed, State::Merged, &mut result).await;
        result
    }

    async fn replaced(&self, desired: &InterfaceList, observed: &InterfaceList) -> Reconciliation {
        let changed = diff_with_defaults(desired, observed, self.builder.resolver()).await;

        let mut to_delete = Vec::new();
        for record in &changed {
            if is_this_delete_required(record, observed, self.builder.resolver()).await {
                to_delete.extend(observed.get(&record.name).cloned());
            }
        }

        let mut result = Reconciliation::default();
        let baseline = self
            .reset_all(to_delete, observed, State::Replaced, &mut result)
            .await;
        self.create_all(changed, &baseline, State::Replaced, &mut result).await;
        result
    }

    async fn overridden(
        &self,
        desired: &InterfaceList,
        observed: &InterfaceList,
    ) -> Reconciliation {
        let mut to_delete = Vec::new();
        for have in observed.iter().filter(|r| r.kind().is_physical()) {
            let candidate = match desired.get(&have.name) {
                None => true,
                Some(want) => {
                    is_change_required_with_defaults(want, observed, self.builder.resolver())
                        .await
                }
            };
            if candidate && is_this_delete_required(have, observed, self.builder.resolver()).await
            {
                to_delete.push(have.clone());
            }
        }

        let mut result = Reconciliation::default();
        let baseline = self
            .reset_all(to_delete, observed, State::Overridden, &mut result)
            .await;
        // Creates diff against every observed kind so loopbacks are not recreated.
        let changed = diff_with_defaults(desired, observed, self.builder.resolver()).await;
        self.create_all(changed, &baseline, State::Overridden, &mut result).await;
        result
    }

    async fn deleted(&self, desired: &InterfaceList, observed: &InterfaceList) -> Reconciliation {
        let targets: Vec<&InterfaceRecord> = if desired.is_empty() {
            observed.iter().collect()
        } else {
            desired
                .iter()
                .filter_map(|want| {
                    let have = observed.get(&want.name);
                    if have.is_none() {
                        debug!(interface = %want.name, "Not observed, skipping");
                    }
                    have
                })
                .collect()
        };

        let mut result = Reconciliation::default();
        for have in targets {
            let built = self
                .builder
                .build(Direction::Delete, have.clone(), Some(have))
                .await;
            result.push(built, delete_outcome(have, State::Merged));
        }
        result
    }

    /// Builds create requests for `commands` against `baseline`.
    async fn create_all(
        &self,
        commands: Vec<InterfaceRecord>,
        baseline: &InterfaceList,
        state: State,
        result: &mut Reconciliation,
    ) {
        for command in commands {
            let have = baseline.get(&command.name);
            let built = self.builder.build(Direction::Create, command, have).await;
            result.push(built, state);
        }
    }

    /// Removes or resets every record of `to_delete` and returns the
    /// observed list as it stands afterwards.
    async fn reset_all(
        &self,
        to_delete: Vec<InterfaceRecord>,
        observed: &InterfaceList,
        state: State,
        result: &mut Reconciliation,
    ) -> InterfaceList {
        let mut baseline = observed.clone();
        let (to_remove, to_reset) = classify_for_deletion(to_delete);

        let mut done = Vec::new();
        for have in to_remove.into_iter().chain(to_reset) {
            let built = self
                .builder
                .build(Direction::Delete, have.clone(), Some(&have))
                .await;
            if built.is_empty() {
                continue;
            }
            if have.kind().is_loopback() {
                baseline.remove(&have.name);
            } else {
                baseline.upsert(built.record.clone());
            }
            result.requests.extend(built.requests);
            done.push(built.record);
        }

        result
            .commands
            .extend(classify_delete_outcome(done, state));
        baseline
    }
}
