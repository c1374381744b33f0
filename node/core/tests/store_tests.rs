use anyhow::Result;
use ethers::types::{Address, H256};
use taskvault_core::store::{DeploymentStore, TaskStore};
use taskvault_core::types::{Submission, TaskRecord, TaskType};
use taskvault_core::{TaskStatus, VerificationConfig};

fn temp_db() -> Result<sled::Db> {
    Ok(sled::Config::new().temporary(true).open()?)
}

fn sample_task(task_id: u64, deadline: u64) -> TaskRecord {
    let verification =
        VerificationConfig::default_for_endpoint("https://vault.example.org", "taskvault-ai")
            .unwrap()
            .serialize();
    TaskRecord {
        task_id,
        title: format!("task {task_id}"),
        description: "demo".to_string(),
        criteria: vec!["clarity".to_string()],
        deadline,
        token_address: Address::zero(),
        prize_amount: "1000000000000000000".to_string(),
        style_commit: H256::zero(),
        created_by: Address::zero(),
        task_type: TaskType::ContentDelivery,
        verification,
        submissions: Vec::new(),
    }
}

#[test]
fn create_and_get_round_trip() -> Result<()> {
    let db = temp_db()?;
    let store = TaskStore::open(&db)?;

    let task = sample_task(7, 2_000_000_000);
    store.create(&task)?;

    assert_eq!(store.get(7)?, Some(task));
    assert_eq!(store.get(8)?, None);
    Ok(())
}

#[test]
fn create_refuses_duplicate_ids() -> Result<()> {
    let db = temp_db()?;
    let store = TaskStore::open(&db)?;

    store.create(&sample_task(1, 2_000_000_000))?;
    assert!(store.create(&sample_task(1, 2_000_000_000)).is_err());
    Ok(())
}

#[test]
fn list_returns_tasks_in_id_order() -> Result<()> {
    let db = temp_db()?;
    let store = TaskStore::open(&db)?;

    for id in [30, 2, 117] {
        store.create(&sample_task(id, 2_000_000_000))?;
    }

    let ids: Vec<u64> = store.list()?.into_iter().map(|t| t.task_id).collect();
    assert_eq!(ids, vec![2, 30, 117]);
    Ok(())
}

#[test]
fn submissions_append_and_flip_derived_status() -> Result<()> {
    let db = temp_db()?;
    let store = TaskStore::open(&db)?;

    let deadline = 2_000_000_000;
    store.create(&sample_task(5, deadline))?;
    assert_eq!(store.get(5)?.unwrap().status(deadline - 10), TaskStatus::Open);

    let updated = store.add_submission(
        5,
        Submission {
            content_hash: "QmSolution".to_string(),
            submitted_by: Address::zero(),
            submitted_at: deadline - 100,
        },
    )?;
    assert_eq!(updated.submissions.len(), 1);
    assert_eq!(updated.status(deadline - 10), TaskStatus::Judging);
    // Past the deadline the same record reads Closed.
    assert_eq!(updated.status(deadline + 1), TaskStatus::Closed);
    Ok(())
}

#[test]
fn add_submission_to_missing_task_fails() -> Result<()> {
    let db = temp_db()?;
    let store = TaskStore::open(&db)?;

    let result = store.add_submission(
        99,
        Submission {
            content_hash: "QmNothing".to_string(),
            submitted_by: Address::zero(),
            submitted_at: 0,
        },
    );
    assert!(result.is_err());
    Ok(())
}

#[test]
fn deployment_updates_merge_into_one_record() -> Result<()> {
    let db = temp_db()?;
    let store = DeploymentStore::open(&db)?;

    let core: Address = "0x1000000000000000000000000000000000000001".parse()?;
    let registry: Address = "0x1000000000000000000000000000000000000002".parse()?;
    let config =
        VerificationConfig::default_for_endpoint("https://vault.example.org", "taskvault-ai")?
            .serialize();

    store.record_contract("sepolia", "TaskVaultCore", core)?;
    store.record_verification_config("sepolia", &config)?;
    store.record_contract("sepolia", "SubmissionRegistry", registry)?;

    let record = store.network("sepolia")?.expect("record exists");
    assert_eq!(record.contracts.len(), 2);
    assert_eq!(
        record.contracts.get("TaskVaultCore").unwrap(),
        &format!("{core:?}")
    );
    assert_eq!(record.verification_config.as_ref(), Some(&config));
    assert!(!record.deployed_at.is_empty());
    Ok(())
}

#[test]
fn networks_are_isolated() -> Result<()> {
    let db = temp_db()?;
    let store = DeploymentStore::open(&db)?;

    let addr: Address = "0x1000000000000000000000000000000000000003".parse()?;
    store.record_contract("sepolia", "TaskVaultCore", addr)?;

    assert!(store.network("celo")?.is_none());
    assert_eq!(store.all()?.len(), 1);
    Ok(())
}

#[test]
fn stored_config_survives_the_text_round_trip() -> Result<()> {
    let db = temp_db()?;
    let store = DeploymentStore::open(&db)?;

    let config =
        VerificationConfig::default_for_endpoint("https://vault.example.org", "taskvault-ai")?;
    store.record_verification_config("celo", &config.serialize())?;

    let stored = store
        .network("celo")?
        .and_then(|record| record.verification_config)
        .expect("config stored");
    assert_eq!(stored.deserialize().unwrap(), config);
    Ok(())
}
