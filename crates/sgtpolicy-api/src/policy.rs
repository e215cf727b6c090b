// Group-based access policy endpoints
//
// A policy binds a producer group and a consumer group to a contract.
// On the wire groups and contracts appear only as idRef links, so every
// convenience operation here starts by resolving names to uuids. New
// policies inherit the policyScope of an existing policy on the
// controller and are created at the lowest priority.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use crate::client::DnacClient;
use crate::error::Error;
use crate::models::{
    IdRef, Policy, PolicyName, PolicySummaryPage, ScalableGroupRefs, TaskReference,
};

const POLICY_PATH: &str = "/v2/data/customer-facing-service/policy/access";
const POLICY_SUMMARY_PATH: &str = "/v2/data/customer-facing-service/summary/policy/access";

/// Priority assigned to newly created policies.
const DEFAULT_POLICY_PRIORITY: u32 = 65_535;

/// Task budget for policy mutations.
const POLICY_TASK_TIMEOUT: Duration = Duration::from_secs(240);

/// Requested state of a policy rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    Enabled,
    Disabled,
    Monitor,
}

impl PolicyMode {
    fn as_wire(self) -> &'static str {
        match self {
            PolicyMode::Enabled => "ENABLED",
            PolicyMode::Disabled => "DISABLED",
            PolicyMode::Monitor => "MONITOR",
        }
    }
}

impl DnacClient {
    // ── Raw endpoints ────────────────────────────────────────────────

    /// List all access policies.
    ///
    /// `GET /v2/data/customer-facing-service/policy/access`
    pub async fn list_policies(&self) -> Result<Vec<Policy>, Error> {
        self.get(POLICY_PATH).await
    }

    /// Fetch the group-based policy summary page.
    pub async fn policy_summary(&self) -> Result<Vec<PolicySummaryPage>, Error> {
        self.get_with(POLICY_SUMMARY_PATH, &[("gbpSummary", "true".into())])
            .await
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// All policies as `producer-consumer` names with their contract,
    /// from the GBP summary.
    pub async fn policy_names(&self) -> Result<Vec<PolicyName>, Error> {
        let page = self.first_gbp_page().await?;
        Ok(page
            .aca_gbp_summary
            .into_iter()
            .map(|p| PolicyName {
                name: format!(
                    "{}-{}",
                    p.producer_name.unwrap_or_default(),
                    p.consumer_name.unwrap_or_default()
                ),
                contract: p.contract_name.unwrap_or_default(),
            })
            .collect())
    }

    /// Number of policies on the controller.
    pub async fn policy_count(&self) -> Result<usize, Error> {
        let page = self.first_gbp_page().await?;
        Ok(page.aca_gbp_summary.len())
    }

    /// Check that each `producer-consumer` name in `names` is present
    /// (or absent when `expect_present` is false) on the controller.
    pub async fn check_policies(
        &self,
        names: &[String],
        expect_present: bool,
    ) -> Result<(), Error> {
        let known: Vec<String> = self.policy_names().await?.into_iter().map(|p| p.name).collect();
        let (present, missing): (Vec<&String>, Vec<&String>) =
            names.iter().partition(|n| known.contains(n));

        if expect_present && !missing.is_empty() {
            return Err(Error::Verification {
                message: format!("expected policies missing from the controller: {missing:?}"),
            });
        }
        if !expect_present && !present.is_empty() {
            return Err(Error::Verification {
                message: format!("unexpected policies present on the controller: {present:?}"),
            });
        }
        Ok(())
    }

    // ── Convenience operations ───────────────────────────────────────

    /// Create a policy binding `producer` and `consumer` groups to
    /// `contract`, all given by name.
    pub async fn create_policy(
        &self,
        policy_name: &str,
        producer: &str,
        consumer: &str,
        contract: &str,
    ) -> Result<(), Error> {
        info!(producer, consumer, contract, "creating policy");
        let contract_id = self.contract_id_by_name(contract).await?;
        let producer_id = self.security_group_id_by_name(producer).await?;
        let consumer_id = self.security_group_id_by_name(consumer).await?;

        // New policies join the scope of the existing policy set.
        let existing = self.list_policies().await?;
        let policy_scope = existing
            .iter()
            .find_map(|p| p.policy_scope.clone())
            .ok_or_else(|| Error::Verification {
                message: "no existing policy to take the policy scope from".into(),
            })?;

        let payload = json!([{
            "isEnabled": "true",
            "name": policy_name,
            "policyScope": policy_scope,
            "priority": DEFAULT_POLICY_PRIORITY,
            "contract": IdRef::new(contract_id),
            "producer": ScalableGroupRefs::single(producer_id),
            "consumer": ScalableGroupRefs::single(consumer_id),
        }]);
        let task: TaskReference = self.post(POLICY_PATH, &payload).await?;
        self.wait_for_task_success(&task, POLICY_TASK_TIMEOUT).await?;
        info!(producer, consumer, contract, "policy created");
        Ok(())
    }

    /// Update the policy between `producer` and `consumer`: switch its
    /// mode, its contract, or both.
    pub async fn update_policy(
        &self,
        producer: &str,
        consumer: &str,
        mode: Option<PolicyMode>,
        new_contract: Option<&str>,
    ) -> Result<(), Error> {
        info!(producer, consumer, "updating policy");
        let (policy, producer_id, consumer_id) =
            self.find_policy_between(producer, consumer).await?;

        let policy_status = match mode {
            Some(m) => m.as_wire().to_owned(),
            None => policy.policy_status.clone().unwrap_or_default(),
        };
        let contract_id = match new_contract {
            Some(name) => self.contract_id_by_name(name).await?,
            None => policy.contract.id_ref.clone(),
        };

        let payload = json!([{
            "id": policy.id,
            "name": policy.name,
            "policyScope": policy.policy_scope,
            "priority": policy.priority,
            "policyStatus": policy_status,
            "contract": IdRef::new(contract_id),
            "producer": ScalableGroupRefs::single(producer_id),
            "consumer": ScalableGroupRefs::single(consumer_id),
        }]);
        let task: TaskReference = self.put(POLICY_PATH, &payload).await?;
        self.wait_for_task_success(&task, POLICY_TASK_TIMEOUT).await?;
        info!(producer, consumer, "policy updated");
        Ok(())
    }

    /// Delete the policy between `producer` and `consumer`.
    ///
    /// `DELETE /v2/data/customer-facing-service/policy/access/{id}`
    pub async fn delete_policy(&self, producer: &str, consumer: &str) -> Result<(), Error> {
        info!(producer, consumer, "deleting policy");
        let (policy, _, _) = self.find_policy_between(producer, consumer).await?;
        let task: TaskReference = self
            .delete(&format!("{POLICY_PATH}/{}", policy.id))
            .await?;
        self.wait_for_task_success(&task, POLICY_TASK_TIMEOUT).await?;
        info!(producer, consumer, "policy deleted");
        Ok(())
    }

    /// Locate the policy linking two groups, returning it with the
    /// resolved group uuids.
    async fn find_policy_between(
        &self,
        producer: &str,
        consumer: &str,
    ) -> Result<(Policy, String, String), Error> {
        let producer_id = self.security_group_id_by_name(producer).await?;
        let consumer_id = self.security_group_id_by_name(consumer).await?;
        debug!(%producer_id, %consumer_id, "resolved policy endpoints");

        let policies = self.list_policies().await?;
        let policy = policies
            .into_iter()
            .find(|p| p.links(&producer_id, &consumer_id))
            .ok_or_else(|| Error::NotFound {
                resource: "policy",
                name: format!("{producer}-{consumer}"),
            })?;
        Ok((policy, producer_id, consumer_id))
    }

    async fn first_gbp_page(&self) -> Result<PolicySummaryPage, Error> {
        self.policy_summary()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Verification {
                message: "controller returned no policy summary".into(),
            })
    }
}
