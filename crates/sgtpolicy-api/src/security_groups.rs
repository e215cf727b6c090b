// Security group (SGT) endpoints
//
// Scalable groups of type USER_DEVICE via customer-facing-service, their
// virtual network attachments, and the ACA controller deploy service.
// Creation and updates are asynchronous: each mutating call hands back a
// task reference that is polled to completion before returning.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::DnacClient;
use crate::error::Error;
use crate::models::{
    IdRef, SecurityGroup, SecurityGroupSummary, Task, TaskReference, VirtualNetwork,
};
use crate::task::DEFAULT_TASK_TIMEOUT;

const SG_PATH: &str = "/v2/data/customer-facing-service/scalablegroup/access";
const SG_SUMMARY_PATH: &str = "/v2/data/customer-facing-service/summary/scalablegroup/access";
const VN_PATH: &str = "/v2/data/customer-facing-service/virtualnetworkcontext";
const ACA_PATH: &str = "/v1/aca-controller-service";

/// Groups not attached to an explicit virtual network land here.
pub const DEFAULT_VN: &str = "DEFAULT_VN";

/// Task budget for group creation.
const CREATE_TASK_TIMEOUT: Duration = Duration::from_secs(120);
/// Task budget for group/VN updates.
const UPDATE_TASK_TIMEOUT: Duration = Duration::from_secs(240);
/// Pause between deploy attempts.
const DEPLOY_RETRY_PAUSE: Duration = Duration::from_secs(10);

/// Which deploy outcome to accept from the ACA controller service.
///
/// The completed deploy task reports its outcome as a `deployStatus=...`
/// marker in the task `data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployVerify {
    /// Require `deployStatus=DONE` (a push actually happened).
    Done,
    /// Require `deployStatus=NO_REQUEST_AVAILABLE` (nothing was pending).
    NoRequest,
    /// Accept either terminal status.
    Any,
}

/// Partial update for an existing security group. `None` fields keep
/// their current value on the controller.
#[derive(Debug, Clone, Default)]
pub struct SecurityGroupUpdate {
    pub security_group_tag: Option<u32>,
    pub description: Option<String>,
    pub propagate_to_aci: Option<bool>,
    /// When non-empty, the group is (re)attached to these virtual
    /// networks after the update.
    pub virtual_networks: Vec<String>,
}

impl DnacClient {
    // ── Raw endpoints ────────────────────────────────────────────────

    /// List all security groups.
    ///
    /// `GET /v2/data/customer-facing-service/scalablegroup/access`
    pub async fn list_security_groups(&self) -> Result<Vec<SecurityGroup>, Error> {
        self.get(SG_PATH).await
    }

    /// List security groups filtered by exact name.
    pub async fn security_groups_by_name(&self, name: &str) -> Result<Vec<SecurityGroup>, Error> {
        self.get_with(SG_PATH, &[("name", name.to_owned())]).await
    }

    /// List security groups filtered by tag number.
    pub async fn security_groups_by_tag(&self, tag: u32) -> Result<Vec<SecurityGroup>, Error> {
        self.get_with(SG_PATH, &[("securityGroupTag", tag.to_string())])
            .await
    }

    /// Fetch a single security group by instance uuid.
    ///
    /// The by-uuid endpoint answers with a one-element list.
    pub async fn get_security_group(&self, uuid: &str) -> Result<SecurityGroup, Error> {
        let groups: Vec<SecurityGroup> = self.get(&format!("{SG_PATH}/{uuid}")).await?;
        groups.into_iter().next().ok_or_else(|| Error::NotFound {
            resource: "security group",
            name: uuid.to_owned(),
        })
    }

    /// Hard-delete a security group by instance uuid.
    ///
    /// `DELETE /v2/data/customer-facing-service/scalablegroup/access/{uuid}`.
    /// Most callers want the soft delete
    /// ([`delete_security_group_by_name`](Self::delete_security_group_by_name))
    /// instead; the controller refuses hard deletes for groups that are
    /// still referenced.
    pub async fn delete_security_group_by_uuid(&self, uuid: &str) -> Result<(), Error> {
        let task: TaskReference = self.delete(&format!("{SG_PATH}/{uuid}")).await?;
        self.wait_for_task_success(&task, DEFAULT_TASK_TIMEOUT).await?;
        Ok(())
    }

    /// Fetch the scalable-group summary page.
    pub async fn security_group_summary(&self) -> Result<Vec<SecurityGroupSummary>, Error> {
        self.get_with(
            SG_SUMMARY_PATH,
            &[
                ("offset", "0".into()),
                ("limit", "10".into()),
                ("scalableGroupSummary", "true".into()),
            ],
        )
        .await
    }

    /// List all virtual network contexts.
    ///
    /// `GET /v2/data/customer-facing-service/virtualnetworkcontext`
    pub async fn list_virtual_networks(&self) -> Result<Vec<VirtualNetwork>, Error> {
        self.get(VN_PATH).await
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Resolve a security group's instance uuid from its name.
    pub async fn security_group_id_by_name(&self, name: &str) -> Result<String, Error> {
        debug!(name, "resolving security group id");
        let groups = self.security_groups_by_name(name).await?;
        groups
            .into_iter()
            .next()
            .map(|g| g.id)
            .ok_or_else(|| Error::NotFound {
                resource: "security group",
                name: name.to_owned(),
            })
    }

    /// Resolve a security group's tag number from its name.
    pub async fn security_group_tag_by_name(&self, name: &str) -> Result<u32, Error> {
        debug!(name, "resolving security group tag");
        let groups = self.security_groups_by_name(name).await?;
        groups
            .into_iter()
            .next()
            .map(|g| g.security_group_tag)
            .ok_or_else(|| Error::NotFound {
                resource: "security group",
                name: name.to_owned(),
            })
    }

    /// Total number of security groups on the controller, from the
    /// scalable-group summary.
    pub async fn security_group_count(&self) -> Result<u64, Error> {
        let summary = self.security_group_summary().await?;
        summary
            .first()
            .map(|page| page.total_sg_count)
            .ok_or_else(|| Error::Verification {
                message: "controller returned no scalable group summary".into(),
            })
    }

    /// Check that `names` are all present (or all absent when
    /// `expect_present` is false) on the controller.
    pub async fn check_security_groups(
        &self,
        names: &[String],
        expect_present: bool,
    ) -> Result<(), Error> {
        let mut present = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            if self.security_groups_by_name(name).await?.is_empty() {
                missing.push(name.clone());
            } else {
                present.push(name.clone());
            }
        }

        if expect_present && !missing.is_empty() {
            return Err(Error::Verification {
                message: format!("expected security groups missing from the controller: {missing:?}"),
            });
        }
        if !expect_present && !present.is_empty() {
            return Err(Error::Verification {
                message: format!("unexpected security groups present on the controller: {present:?}"),
            });
        }
        Ok(())
    }

    // ── Convenience operations ───────────────────────────────────────

    /// Create a security group and attach it to virtual networks.
    ///
    /// Posts a USER_DEVICE scalable group, waits for the creation task,
    /// then attaches the group to `virtual_networks` ([`DEFAULT_VN`]
    /// when the slice is empty).
    pub async fn create_security_group(
        &self,
        name: &str,
        tag: u32,
        description: &str,
        virtual_networks: &[String],
    ) -> Result<(), Error> {
        info!(name, tag, "creating security group");
        let payload = json!([{
            "name": name,
            "description": description,
            "scalableGroupType": "USER_DEVICE",
            "securityGroupTag": tag,
        }]);
        let task: TaskReference = self.post(SG_PATH, &payload).await?;
        self.wait_for_task_success(&task, CREATE_TASK_TIMEOUT).await?;
        info!(name, "security group created");

        let vns: Vec<String> = if virtual_networks.is_empty() {
            vec![DEFAULT_VN.to_owned()]
        } else {
            virtual_networks.to_vec()
        };
        self.add_to_virtual_networks(name, &vns).await
    }

    /// Attach an existing security group to the named virtual networks.
    ///
    /// Every name in `virtual_networks` must exist on the controller;
    /// attachments that are already in place are left untouched.
    pub async fn add_to_virtual_networks(
        &self,
        name: &str,
        virtual_networks: &[String],
    ) -> Result<(), Error> {
        let group_id = self.security_group_id_by_name(name).await?;
        let sg_ref = IdRef::new(group_id);

        let vn_list = self.list_virtual_networks().await?;
        let mut matched = 0usize;
        let mut updated: Vec<VirtualNetwork> = Vec::new();
        for mut vn in vn_list {
            if !virtual_networks.contains(&vn.name) {
                continue;
            }
            matched += 1;
            if !vn.scalable_group.contains(&sg_ref) {
                vn.scalable_group.push(sg_ref.clone());
                updated.push(vn);
            }
        }

        if matched != virtual_networks.len() {
            return Err(Error::Verification {
                message: format!(
                    "not all requested virtual networks exist on the controller \
                     ({matched} of {} found); create them first",
                    virtual_networks.len()
                ),
            });
        }

        if updated.is_empty() {
            debug!(name, "security group already attached to all requested virtual networks");
            return Ok(());
        }

        let task: TaskReference = self.put(VN_PATH, &updated).await?;
        self.wait_for_task_success(&task, UPDATE_TASK_TIMEOUT).await?;
        info!(name, vns = ?virtual_networks, "security group attached to virtual networks");
        Ok(())
    }

    /// Update a security group in place (tag, description, ACI
    /// propagation), then optionally re-attach virtual networks.
    pub async fn update_security_group(
        &self,
        name: &str,
        update: SecurityGroupUpdate,
    ) -> Result<(), Error> {
        info!(name, "updating security group");
        let mut group = self.fetch_group_by_name(name).await?;

        if let Some(tag) = update.security_group_tag {
            group.security_group_tag = tag;
        }
        if let Some(description) = update.description {
            group.description = description;
        }
        if let Some(propagate) = update.propagate_to_aci {
            group.propagate_to_aci = Some(propagate);
        }

        let task: TaskReference = self.put(SG_PATH, &[&group]).await?;
        self.wait_for_task_success(&task, UPDATE_TASK_TIMEOUT).await?;

        if update.virtual_networks.is_empty() {
            return Ok(());
        }
        self.add_to_virtual_networks(name, &update.virtual_networks).await
    }

    /// Soft-delete a security group by name (PUT with `isDeleted: true`).
    pub async fn delete_security_group_by_name(&self, name: &str) -> Result<(), Error> {
        info!(name, "deleting security group");
        let group = self.fetch_group_by_name(name).await?;
        self.soft_delete_group(group).await
    }

    /// Soft-delete a security group by its tag number.
    pub async fn delete_security_group_by_tag(&self, tag: u32) -> Result<(), Error> {
        info!(tag, "deleting security group by tag");
        let group = self
            .security_groups_by_tag(tag)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                resource: "security group",
                name: format!("tag {tag}"),
            })?;
        self.soft_delete_group(group).await
    }

    async fn fetch_group_by_name(&self, name: &str) -> Result<SecurityGroup, Error> {
        self.security_groups_by_name(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                resource: "security group",
                name: name.to_owned(),
            })
    }

    async fn soft_delete_group(&self, mut group: SecurityGroup) -> Result<(), Error> {
        group.is_deleted = Some(true);
        let name = group.name.clone();
        let task: TaskReference = self.put(SG_PATH, &[&group]).await?;
        self.wait_for_task_success(&task, DEFAULT_TASK_TIMEOUT).await?;
        info!(name, "security group deleted");
        Ok(())
    }

    // ── Deploy ───────────────────────────────────────────────────────

    /// Push security groups to the network via the ACA controller
    /// service, verifying the reported deploy status.
    ///
    /// `PUT /v1/aca-controller-service/pushSGs`
    pub async fn push_security_groups(&self, verify: DeployVerify) -> Result<(), Error> {
        info!("pushing security groups");
        let task: TaskReference = self.put_empty(&format!("{ACA_PATH}/pushSGs")).await?;
        let status = self.wait_for_task(&task, DEFAULT_TASK_TIMEOUT).await?;
        check_deploy_status(&status, verify)
    }

    /// Run an ACA deploy, retrying transient failures with a pause
    /// between attempts.
    ///
    /// `PUT /v1/aca-controller-service/deploy`
    pub async fn deploy_security_groups(
        &self,
        verify: DeployVerify,
        attempts: u32,
    ) -> Result<(), Error> {
        let mut remaining = attempts.max(1);
        loop {
            remaining -= 1;
            let result = self.try_deploy(verify).await;
            match result {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && remaining > 0 => {
                    warn!(error = %e, remaining, "deploy attempt failed, retrying");
                    tokio::time::sleep(DEPLOY_RETRY_PAUSE).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_deploy(&self, verify: DeployVerify) -> Result<(), Error> {
        info!("deploying group-based policy");
        let task: TaskReference = self.put_empty(&format!("{ACA_PATH}/deploy")).await?;
        let status = self.wait_for_task(&task, DEFAULT_TASK_TIMEOUT).await?;
        check_deploy_status(&status, verify)
    }
}

/// Validate the `deployStatus=...` marker of a completed deploy task
/// against the requested verification mode.
fn check_deploy_status(status: &Task, verify: DeployVerify) -> Result<(), Error> {
    if status.is_failed() {
        return Err(Error::TaskFailed {
            task_id: status.id.clone(),
            reason: status.failure_reason_or_default(),
        });
    }

    let data = status.data.as_deref().unwrap_or_default();
    let ok = match verify {
        DeployVerify::Done => data == "deployStatus=DONE",
        DeployVerify::NoRequest => data == "deployStatus=NO_REQUEST_AVAILABLE",
        DeployVerify::Any => {
            data == "deployStatus=DONE" || data == "deployStatus=NO_REQUEST_AVAILABLE"
        }
    };

    if ok {
        info!(data, "deploy verified");
        Ok(())
    } else {
        Err(Error::Deploy {
            status: data.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn deploy_task(data: &str) -> Task {
        Task {
            id: "t1".into(),
            is_error: Some(false),
            failure_reason: None,
            progress: None,
            data: Some(data.into()),
            error_code: None,
            start_time: Some(1),
            end_time: Some(2),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn done_status_passes_done_and_any() {
        let task = deploy_task("deployStatus=DONE");
        assert!(check_deploy_status(&task, DeployVerify::Done).is_ok());
        assert!(check_deploy_status(&task, DeployVerify::Any).is_ok());
        assert!(check_deploy_status(&task, DeployVerify::NoRequest).is_err());
    }

    #[test]
    fn no_request_status_passes_no_request_and_any() {
        let task = deploy_task("deployStatus=NO_REQUEST_AVAILABLE");
        assert!(check_deploy_status(&task, DeployVerify::NoRequest).is_ok());
        assert!(check_deploy_status(&task, DeployVerify::Any).is_ok());
        assert!(check_deploy_status(&task, DeployVerify::Done).is_err());
    }

    #[test]
    fn unexpected_status_is_a_deploy_error() {
        let task = deploy_task("deployStatus=FAILED");
        let err = check_deploy_status(&task, DeployVerify::Any).unwrap_err();
        assert!(matches!(err, Error::Deploy { .. }));
    }

    #[test]
    fn failed_task_beats_status_check() {
        let mut task = deploy_task("deployStatus=DONE");
        task.is_error = Some(true);
        task.failure_reason = Some("aca service down".into());
        let err = check_deploy_status(&task, DeployVerify::Done).unwrap_err();
        assert!(matches!(err, Error::TaskFailed { .. }));
    }
}
