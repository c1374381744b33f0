use crate::config::SerializedVerificationConfig;
use crate::types::{NetworkDeployment, Submission, TaskRecord};
use anyhow::Result;
use ethers::types::Address;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::collections::BTreeMap;

/// Persistent task collection keyed by on-chain task id.
pub struct TaskStore {
    tree: sled::Tree,
}

impl TaskStore {
    pub fn open(db: &sled::Db) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree("tasks")?,
        })
    }

    // Zero-padded so iteration order is numeric order.
    fn key(task_id: u64) -> String {
        format!("task:{task_id:020}")
    }

    /// Persist a new task. Refuses to overwrite an existing id.
    pub fn create(&self, task: &TaskRecord) -> Result<()> {
        let key = Self::key(task.task_id);
        let value = serde_json::to_vec(task)?;

        let swap = self
            .tree
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(value))?;
        if swap.is_err() {
            anyhow::bail!("task {} already exists", task.task_id);
        }

        self.tree.flush()?;
        Ok(())
    }

    pub fn get(&self, task_id: u64) -> Result<Option<TaskRecord>> {
        match self.tree.get(Self::key(task_id).as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> Result<Vec<TaskRecord>> {
        let mut tasks = Vec::new();
        for item in self.tree.iter() {
            let (_key, value) = item?;
            tasks.push(serde_json::from_slice(&value)?);
        }
        Ok(tasks)
    }

    /// Append a submission to a task, atomically with respect to
    /// concurrent appends on the same record.
    pub fn add_submission(&self, task_id: u64, submission: Submission) -> Result<TaskRecord> {
        let key = Self::key(task_id);

        let result = self.tree.transaction(|tx| {
            let raw = tx.get(key.as_bytes())?.ok_or_else(|| {
                ConflictableTransactionError::Abort(format!("task {task_id} not found"))
            })?;
            let mut task: TaskRecord = serde_json::from_slice(&raw)
                .map_err(|e| ConflictableTransactionError::Abort(e.to_string()))?;

            task.submissions.push(submission.clone());

            let value = serde_json::to_vec(&task)
                .map_err(|e| ConflictableTransactionError::Abort(e.to_string()))?;
            tx.insert(key.as_bytes(), value)?;
            Ok(task)
        });

        match result {
            Ok(task) => {
                self.tree.flush()?;
                Ok(task)
            }
            Err(TransactionError::Abort(msg)) => anyhow::bail!(msg),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }
}

/// Deployment records, one per network. Every mutation is a single
/// transactional read-modify-write of that network's record, so two
/// concurrent deployments against the same network cannot lose updates.
pub struct DeploymentStore {
    tree: sled::Tree,
}

impl DeploymentStore {
    pub fn open(db: &sled::Db) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree("deployments")?,
        })
    }

    fn key(network: &str) -> String {
        format!("network:{network}")
    }

    pub fn record_contract(&self, network: &str, contract: &str, address: Address) -> Result<()> {
        let contract = contract.to_string();
        self.update_network(network, move |record| {
            // Debug formatting keeps the full 40-digit hex form.
            record
                .contracts
                .insert(contract.clone(), format!("{address:?}"));
        })
    }

    pub fn record_verification_config(
        &self,
        network: &str,
        config: &SerializedVerificationConfig,
    ) -> Result<()> {
        let config = config.clone();
        self.update_network(network, move |record| {
            record.verification_config = Some(config.clone());
        })
    }

    pub fn network(&self, network: &str) -> Result<Option<NetworkDeployment>> {
        match self.tree.get(Self::key(network).as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn all(&self) -> Result<BTreeMap<String, NetworkDeployment>> {
        let mut networks = BTreeMap::new();
        for item in self.tree.iter() {
            let (key, value) = item?;
            let name = String::from_utf8_lossy(&key)
                .trim_start_matches("network:")
                .to_string();
            networks.insert(name, serde_json::from_slice(&value)?);
        }
        Ok(networks)
    }

    fn update_network(
        &self,
        network: &str,
        apply: impl Fn(&mut NetworkDeployment),
    ) -> Result<()> {
        let key = Self::key(network);

        let result = self.tree.transaction(|tx| {
            let mut record = match tx.get(key.as_bytes())? {
                Some(raw) => serde_json::from_slice(&raw)
                    .map_err(|e| ConflictableTransactionError::Abort(e.to_string()))?,
                None => NetworkDeployment::default(),
            };

            apply(&mut record);
            record.deployed_at = chrono::Utc::now().to_rfc3339();

            let value = serde_json::to_vec(&record)
                .map_err(|e| ConflictableTransactionError::Abort(e.to_string()))?;
            tx.insert(key.as_bytes(), value)?;
            Ok(())
        });

        match result {
            Ok(()) => {
                self.tree.flush()?;
                Ok(())
            }
            Err(TransactionError::Abort(msg)) => anyhow::bail!(msg),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }
}
