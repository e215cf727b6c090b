// DNA Center response types
//
// Models for the controller's customer-facing-service JSON API. All
// responses are wrapped in the `ResponseEnvelope<T>` envelope. Fields use
// `#[serde(default)]` liberally because the API is inconsistent about
// field presence across controller releases, and every entity carries a
// flattened `extra` map so unrecognized fields survive a GET-modify-PUT
// round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard DNA Center response envelope.
///
/// Every northbound endpoint wraps its payload:
/// ```json
/// { "response": ..., "version": "1.0" }
/// ```
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub response: T,
    #[serde(default)]
    pub version: Option<String>,
}

/// Reference to an asynchronous task, returned by every mutating call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReference {
    pub task_id: String,
    #[serde(default)]
    pub url: Option<String>,
}

// ── Task ─────────────────────────────────────────────────────────────

/// Task status from `GET /api/v1/task/{id}`.
///
/// A task is terminal when `isError` is `true`, or when `isError` is
/// false/absent and `endTime` is set. `failureReason` and `progress` are
/// free-text from the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub is_error: Option<bool>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Epoch milliseconds. Present once the task has finished.
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    /// Terminal-failure predicate: the controller flagged an error.
    pub fn is_failed(&self) -> bool {
        self.is_error == Some(true)
    }

    /// Terminal-success predicate: no error flag and an end time present.
    pub fn is_success(&self) -> bool {
        !self.is_failed() && self.end_time.is_some()
    }

    /// Terminal predicate: either outcome.
    pub fn is_complete(&self) -> bool {
        self.is_failed() || self.is_success()
    }

    /// The failure reason, or a placeholder when the controller gave none.
    pub fn failure_reason_or_default(&self) -> String {
        self.failure_reason
            .clone()
            .unwrap_or_else(|| "no failure reason reported".into())
    }

    /// Start time as a UTC timestamp. The controller reports epoch millis.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.and_then(DateTime::from_timestamp_millis)
    }

    /// End time as a UTC timestamp, present once the task is terminal.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.end_time.and_then(DateTime::from_timestamp_millis)
    }
}

// ── Security Group ───────────────────────────────────────────────────

/// A scalable group of type `USER_DEVICE` (an SGT).
///
/// Round-trippable: update and soft-delete flows GET this, mutate a few
/// fields, and PUT it back. `extra` carries whatever else the controller
/// included (e.g. `resourceVersion` on some releases).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub security_group_tag: u32,
    #[serde(default)]
    pub scalable_group_type: Option<String>,
    #[serde(default)]
    pub vn_agnostic: Option<bool>,
    #[serde(default)]
    pub propagate_to_aci: Option<bool>,
    #[serde(default)]
    pub resource_version: Option<i64>,
    /// Soft-delete marker: PUT with `isDeleted: true` removes the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of the scalable-group summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupSummary {
    #[serde(rename = "totalSGCount", default)]
    pub total_sg_count: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Virtual Network ──────────────────────────────────────────────────

/// A `{ "idRef": "<uuid>" }` reference, used wherever the API links
/// entities by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdRef {
    pub id_ref: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id_ref: id.into() }
    }
}

/// A virtual network context, holding the scalable groups attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scalable_group: Vec<IdRef>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Access Contract ──────────────────────────────────────────────────

/// Permit/deny action of a contract clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClauseAccess {
    Permit,
    Deny,
}

/// One classifier clause of an access contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractClause {
    pub access: ClauseAccess,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_network_identities: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContractClause {
    /// A bare permit/deny clause with no classifier.
    pub fn access_only(access: ClauseAccess) -> Self {
        Self {
            access,
            protocol: None,
            dst_network_identities: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A named access contract with its ordered clause list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessContract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub clause: Vec<ContractClause>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AccessContract {
    /// A new contract spec (no id) ready for a create call.
    pub fn new(name: impl Into<String>, description: impl Into<String>, clause: Vec<ContractClause>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            clause,
            extra: serde_json::Map::new(),
        }
    }
}

/// One page of the contract summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummaryPage {
    #[serde(default)]
    pub aca_contract_summary: Vec<ContractSummary>,
    #[serde(default)]
    pub total_contract_count: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Summary entry for a single contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Policy ───────────────────────────────────────────────────────────

/// Producer/consumer side of a policy: a list of scalable-group refs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalableGroupRefs {
    #[serde(default)]
    pub scalable_group: Vec<IdRef>,
}

impl ScalableGroupRefs {
    pub fn single(id: impl Into<String>) -> Self {
        Self {
            scalable_group: vec![IdRef::new(id)],
        }
    }
}

/// A group-based access policy binding producer SGT, consumer SGT, and
/// an access contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub policy_scope: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub policy_status: Option<String>,
    pub contract: IdRef,
    pub producer: ScalableGroupRefs,
    pub consumer: ScalableGroupRefs,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Policy {
    /// True when this policy links `producer` -> `consumer` by idRef.
    pub fn links(&self, producer_id: &str, consumer_id: &str) -> bool {
        let has = |refs: &ScalableGroupRefs, id: &str| {
            refs.scalable_group.iter().any(|r| r.id_ref == id)
        };
        has(&self.producer, producer_id) && has(&self.consumer, consumer_id)
    }
}

/// One page of the group-based-policy summary (`gbpSummary=true`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummaryPage {
    #[serde(rename = "acaGBPSummary", default)]
    pub aca_gbp_summary: Vec<PolicySummary>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Summary entry for a single policy, keyed by participant names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    #[serde(default)]
    pub producer_name: Option<String>,
    #[serde(default)]
    pub consumer_name: Option<String>,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Human-readable policy identity derived from the summary:
/// `<producer>-<consumer>` plus the contract it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyName {
    pub name: String,
    pub contract: String,
}
