use crate::config::SerializedVerificationConfig;
use crate::status::TaskStatus;
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task category. OmiAiDevice is kept for stored records but permanently
/// disabled for new tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    TwitterInteract,
    ContentDelivery,
    OmiAiDevice,
}

impl TaskType {
    pub fn is_selectable(&self) -> bool {
        !matches!(self, TaskType::OmiAiDevice)
    }
}

/// Persisted task, keyed by the on-chain task id. Carries no status
/// field: status is derived on every read (see [`TaskStatus::derive`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_id: u64,
    pub title: String,
    pub description: String,
    pub criteria: Vec<String>,
    /// Unix seconds.
    pub deadline: u64,
    pub token_address: Address,
    /// Prize in token base units, decimal string for text storage.
    pub prize_amount: String,
    pub style_commit: H256,
    pub created_by: Address,
    pub task_type: TaskType,
    pub verification: SerializedVerificationConfig,
    pub submissions: Vec<Submission>,
}

impl TaskRecord {
    pub fn status(&self, now: u64) -> TaskStatus {
        TaskStatus::derive(self.deadline, self.submissions.len() as u64, now)
    }
}

/// One solution submitted against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Off-chain content reference (IPFS hash in practice).
    pub content_hash: String,
    pub submitted_by: Address,
    pub submitted_at: u64,
}

/// Per-network deployment record: contract name to address, plus the
/// default verification config used on that network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    pub contracts: BTreeMap<String, String>,
    pub verification_config: Option<SerializedVerificationConfig>,
    /// RFC 3339, refreshed on every write to the record.
    pub deployed_at: String,
}
