// Access contract endpoints
//
// Contract CRUD goes through customer-facing-service; deletion goes
// through the cfs-intent service with a deleteList payload. Name
// listing and counting use the contract summary endpoint, which pages
// with a fixed offset/limit.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::DnacClient;
use crate::error::Error;
use crate::models::{AccessContract, ContractSummaryPage, TaskReference};

const CONTRACT_PATH: &str = "/v2/data/customer-facing-service/contract/access";
const CONTRACT_INTENT_PATH: &str = "/v2/data/cfs-intent/contract/access";
const CONTRACT_SUMMARY_PATH: &str = "/v2/data/customer-facing-service/summary/contract/access";

/// Contracts shipped with the controller. These are never deleted by
/// [`DnacClient::delete_all_contracts`].
pub const RESERVED_CONTRACTS: [&str; 4] = ["Deny IP", "Deny_IP_Log", "Permit IP", "Permit_IP_Log"];

/// Task budget for contract mutations.
const CONTRACT_TASK_TIMEOUT: Duration = Duration::from_secs(240);

impl DnacClient {
    // ── Raw endpoints ────────────────────────────────────────────────

    /// List all access contracts.
    ///
    /// `GET /v2/data/customer-facing-service/contract/access`
    pub async fn list_contracts(&self) -> Result<Vec<AccessContract>, Error> {
        self.get(CONTRACT_PATH).await
    }

    /// List access contracts filtered by exact name.
    pub async fn contracts_by_name(&self, name: &str) -> Result<Vec<AccessContract>, Error> {
        self.get_with(CONTRACT_PATH, &[("name", name.to_owned())])
            .await
    }

    /// Fetch a single contract by instance uuid.
    ///
    /// The by-uuid endpoint answers with a one-element list.
    pub async fn get_contract(&self, uuid: &str) -> Result<AccessContract, Error> {
        let contracts: Vec<AccessContract> = self.get(&format!("{CONTRACT_PATH}/{uuid}")).await?;
        contracts.into_iter().next().ok_or_else(|| Error::NotFound {
            resource: "contract",
            name: uuid.to_owned(),
        })
    }

    /// Fetch the contract summary page.
    pub async fn contract_summary(&self) -> Result<Vec<ContractSummaryPage>, Error> {
        self.get_with(
            CONTRACT_SUMMARY_PATH,
            &[
                ("offset", "0".into()),
                ("limit", "5000".into()),
                ("contractSummary", "true".into()),
            ],
        )
        .await
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Resolve a contract's instance uuid from its name.
    pub async fn contract_id_by_name(&self, name: &str) -> Result<String, Error> {
        debug!(name, "resolving contract id");
        let contracts = self.contracts_by_name(name).await?;
        contracts
            .into_iter()
            .find_map(|c| (c.name == name).then_some(c.id))
            .flatten()
            .ok_or_else(|| Error::NotFound {
                resource: "contract",
                name: name.to_owned(),
            })
    }

    /// All contract names known to the controller, from the summary.
    pub async fn contract_names(&self) -> Result<Vec<String>, Error> {
        let page = self.first_summary_page().await?;
        Ok(page
            .aca_contract_summary
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// Total number of contracts on the controller.
    pub async fn contract_count(&self) -> Result<u64, Error> {
        let page = self.first_summary_page().await?;
        Ok(page.total_contract_count)
    }

    /// Check that `names` are all present (or all absent when
    /// `expect_present` is false) on the controller.
    pub async fn check_contracts(
        &self,
        names: &[String],
        expect_present: bool,
    ) -> Result<(), Error> {
        let known = self.contract_names().await?;
        let (present, missing): (Vec<&String>, Vec<&String>) =
            names.iter().partition(|n| known.contains(n));

        if expect_present && !missing.is_empty() {
            return Err(Error::Verification {
                message: format!("expected contracts missing from the controller: {missing:?}"),
            });
        }
        if !expect_present && !present.is_empty() {
            return Err(Error::Verification {
                message: format!("unexpected contracts present on the controller: {present:?}"),
            });
        }
        Ok(())
    }

    // ── Convenience operations ───────────────────────────────────────

    /// Create a new access contract and wait for the task to finish.
    pub async fn create_contract(&self, contract: &AccessContract) -> Result<(), Error> {
        info!(name = %contract.name, "creating contract");
        let task: TaskReference = self.post(CONTRACT_PATH, &[contract]).await?;
        self.wait_for_task_success(&task, CONTRACT_TASK_TIMEOUT).await?;
        info!(name = %contract.name, "contract created");
        Ok(())
    }

    /// Update an existing contract by name. The instance uuid is
    /// resolved from the controller and stamped onto `contract` before
    /// the PUT.
    pub async fn update_contract(
        &self,
        name: &str,
        mut contract: AccessContract,
    ) -> Result<(), Error> {
        info!(name, "updating contract");
        contract.id = Some(self.contract_id_by_name(name).await?);
        let task: TaskReference = self.put(CONTRACT_PATH, &[&contract]).await?;
        self.wait_for_task_success(&task, CONTRACT_TASK_TIMEOUT).await?;
        info!(name, "contract updated");
        Ok(())
    }

    /// Delete a contract by name through the cfs-intent service.
    ///
    /// `POST /v2/data/cfs-intent/contract/access` with a `deleteList`
    /// body. Deletion fails on the controller side when the contract is
    /// still referenced by a policy; that surfaces as a failed task.
    pub async fn delete_contract(&self, name: &str) -> Result<(), Error> {
        info!(name, "deleting contract");
        let id = self.contract_id_by_name(name).await?;
        let task: TaskReference = self
            .post(CONTRACT_INTENT_PATH, &json!({ "deleteList": [id] }))
            .await?;
        self.wait_for_task_success(&task, CONTRACT_TASK_TIMEOUT).await?;
        info!(name, "contract deleted");
        Ok(())
    }

    /// Delete a contract by instance uuid.
    ///
    /// `DELETE /v2/data/customer-facing-service/contract/access/{uuid}`.
    /// Unlike [`delete_contract`](Self::delete_contract) this skips the
    /// cfs-intent service and the name lookup.
    pub async fn delete_contract_by_uuid(&self, uuid: &str) -> Result<(), Error> {
        let task: TaskReference = self.delete(&format!("{CONTRACT_PATH}/{uuid}")).await?;
        self.wait_for_task_success(&task, CONTRACT_TASK_TIMEOUT).await?;
        Ok(())
    }

    /// Confirm that deleting a contract is rejected by the controller,
    /// e.g. because a policy still references it.
    pub async fn delete_contract_expect_failure(&self, name: &str) -> Result<(), Error> {
        info!(name, "deleting contract, expecting rejection");
        let id = self.contract_id_by_name(name).await?;
        let task: TaskReference = self
            .post(CONTRACT_INTENT_PATH, &json!({ "deleteList": [id] }))
            .await?;
        self.wait_for_task_failure(&task, CONTRACT_TASK_TIMEOUT).await?;
        Ok(())
    }

    /// Delete every non-reserved contract, skipping the names in
    /// `exclusions` as well. Contracts that fail to delete are logged
    /// and skipped.
    pub async fn delete_all_contracts(&self, exclusions: &[String]) -> Result<(), Error> {
        let contracts = self.list_contracts().await?;
        for contract in contracts {
            let keep = RESERVED_CONTRACTS.contains(&contract.name.as_str())
                || exclusions.contains(&contract.name);
            if keep {
                continue;
            }
            let Some(id) = contract.id.as_deref() else {
                continue;
            };
            let task: Result<TaskReference, Error> = self
                .post(CONTRACT_INTENT_PATH, &json!({ "deleteList": [id] }))
                .await;
            let deleted = match task {
                Ok(task) => self.wait_for_task_success(&task, CONTRACT_TASK_TIMEOUT).await,
                Err(e) => Err(e),
            };
            if let Err(e) = deleted {
                warn!(name = %contract.name, error = %e, "could not delete contract");
            }
        }
        Ok(())
    }

    async fn first_summary_page(&self) -> Result<ContractSummaryPage, Error> {
        self.contract_summary()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Verification {
                message: "controller returned no contract summary".into(),
            })
    }
}
