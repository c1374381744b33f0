use anyhow::{bail, Context, Result};
use ethers::{
    abi::{Abi, Tokenize},
    contract::ContractFactory,
    types::{Address, Bytes, U256},
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use taskvault_core::commitment::style_commitment;
use taskvault_core::contracts::{Client, MockTokenClient, RegistryClient, TaskVaultClient};
use taskvault_core::countries::{pack_countries, Country};
use taskvault_core::network::NetworkConfig;
use taskvault_core::scope::{derive_scope, verification_endpoint, SCOPE_NAME};
use taskvault_core::store::{DeploymentStore, TaskStore};
use taskvault_core::types::{NetworkDeployment, Submission, TaskRecord, TaskType};
use taskvault_core::VerificationConfig;
use tracing::info;

/// Compiled contract artifact (hardhat layout: abi + bytecode).
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    pub abi: Abi,
    pub bytecode: String,
}

pub fn load_artifact(dir: &str, name: &str) -> Result<ContractArtifact> {
    let path = Path::new(dir).join(format!("{name}.json"));
    let raw = std::fs::read(&path)
        .with_context(|| format!("reading artifact {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing artifact {name}"))
}

async fn deploy_contract<T: Tokenize>(
    client: Arc<Client>,
    artifact: &ContractArtifact,
    args: T,
) -> Result<Address> {
    let bytecode: Bytes = artifact.bytecode.parse()?;
    let factory = ContractFactory::new(artifact.abi.clone(), bytecode, client);
    let contract = factory.deploy(args)?.send().await?;
    Ok(contract.address())
}

/// Deploy the three contracts and wire them together. Strictly serial:
/// every later step consumes an address produced by an earlier one.
/// Each address is recorded before the next step runs, so a crash
/// leaves a partial but accurate record.
pub async fn deploy(
    client: Arc<Client>,
    store: &DeploymentStore,
    network: &NetworkConfig,
    artifacts_dir: &str,
    identity_hub: Address,
    base_url: &str,
    with_mock_token: bool,
) -> Result<()> {
    let deployer = client.address();
    info!("deploying to {} as {:?}", network.name, deployer);

    let core_artifact = load_artifact(artifacts_dir, "TaskVaultCore")?;
    // Deployer doubles as the judge until governance exists.
    let core_addr = deploy_contract(client.clone(), &core_artifact, (deployer,)).await?;
    info!("TaskVaultCore deployed at {core_addr:?}");
    store.record_contract(&network.name, "TaskVaultCore", core_addr)?;

    let registry_artifact = load_artifact(artifacts_dir, "SubmissionRegistry")?;
    let registry_addr = deploy_contract(
        client.clone(),
        &registry_artifact,
        (deployer, core_addr, identity_hub),
    )
    .await?;
    info!("SubmissionRegistry deployed at {registry_addr:?}");
    store.record_contract(&network.name, "SubmissionRegistry", registry_addr)?;

    let core = TaskVaultClient::new(core_addr, client.clone());
    core.set_submission_registry(registry_addr).await?;
    info!("SubmissionRegistry set in TaskVaultCore");

    let vault_artifact = load_artifact(artifacts_dir, "PrizeVault")?;
    let vault_addr = deploy_contract(client.clone(), &vault_artifact, (core_addr,)).await?;
    info!("PrizeVault deployed at {vault_addr:?}");
    store.record_contract(&network.name, "PrizeVault", vault_addr)?;

    core.set_prize_vault(vault_addr).await?;
    info!("PrizeVault set in TaskVaultCore");

    let default_config = VerificationConfig::default_for_endpoint(base_url, SCOPE_NAME)?;
    store.record_verification_config(&network.name, &default_config.serialize())?;
    info!("default verification config saved");

    if with_mock_token {
        let token_artifact = load_artifact(artifacts_dir, "ERC20Mock")?;
        let token_addr = deploy_contract(
            client.clone(),
            &token_artifact,
            (
                "MockToken".to_string(),
                "MOCK".to_string(),
                deployer,
                ethers::utils::parse_ether("100000")?,
            ),
        )
        .await?;
        info!("ERC20Mock deployed at {token_addr:?}");
        store.record_contract(&network.name, "ERC20Mock", token_addr)?;

        core.approve_prize_token(token_addr).await?;
        info!("ERC20Mock approved as prize token");
    }

    Ok(())
}

/// The recorded mock token, when the chosen prize token is it. Real
/// prize tokens never go through the mint/approve test flow.
pub fn mock_token_address(record: &NetworkDeployment, token: Address) -> Option<Address> {
    let recorded: Address = record.contracts.get("ERC20Mock")?.parse().ok()?;
    (recorded == token).then_some(recorded)
}

pub struct CreateTaskParams {
    pub task_id: u64,
    pub title: String,
    pub description: String,
    pub criteria: Vec<String>,
    pub deadline: u64,
    pub token_address: Address,
    pub prize_amount: U256,
    pub judge_style: String,
    pub salt: String,
    pub minimum_age: u64,
    pub excluded_countries: Vec<Country>,
    pub ofac_enabled: [bool; 3],
    pub task_type: TaskType,
    pub max_per_time: U256,
    pub max_per_day: U256,
    pub base_url: String,
    pub created_by: Address,
}

/// Create a task on-chain and mirror it into the task store. The scope
/// is derived from the task's canonical verification endpoint, so it
/// must be computed against the id this task will hold on-chain.
pub async fn create_task(
    core: &TaskVaultClient,
    tasks: &TaskStore,
    mock_token: Option<MockTokenClient>,
    params: CreateTaskParams,
) -> Result<()> {
    if !params.task_type.is_selectable() {
        bail!("task type {:?} is not selectable", params.task_type);
    }

    // Fund the prize from the mock token before escrowing it.
    if let Some(token) = &mock_token {
        token.mint(params.created_by, params.prize_amount).await?;
        token.approve(core.address(), params.prize_amount).await?;
        info!("minted and approved {} mock token units", params.prize_amount);
    }

    let endpoint = verification_endpoint(&params.base_url, params.task_id);
    let verification = VerificationConfig {
        scope: derive_scope(&endpoint, SCOPE_NAME),
        attestation_id: U256::from(VerificationConfig::ATTESTATION_ID),
        older_than_enabled: params.minimum_age > 0,
        older_than: U256::from(params.minimum_age),
        forbidden_countries_enabled: !params.excluded_countries.is_empty(),
        forbidden_countries_list_packed: pack_countries(&params.excluded_countries)?,
        ofac_enabled: params.ofac_enabled,
    };

    let style_commit = style_commitment(&params.criteria, &params.judge_style, &params.salt);

    core.create_task(
        params.criteria.clone(),
        style_commit,
        params.deadline,
        params.token_address,
        params.prize_amount,
        &verification,
        params.max_per_time,
        params.max_per_day,
    )
    .await?;
    info!("task {} created on-chain", params.task_id);

    let record = TaskRecord {
        task_id: params.task_id,
        title: params.title,
        description: params.description,
        criteria: params.criteria,
        deadline: params.deadline,
        token_address: params.token_address,
        prize_amount: params.prize_amount.to_string(),
        style_commit,
        created_by: params.created_by,
        task_type: params.task_type,
        verification: verification.serialize(),
        submissions: Vec::new(),
    };
    tasks.create(&record)?;
    info!("task {} recorded", record.task_id);

    Ok(())
}

/// Submit a solution on-chain and mirror it into the task record.
pub async fn submit_solution(
    registry: &RegistryClient,
    tasks: &TaskStore,
    task_id: u64,
    content_hash: &str,
    submitted_by: Address,
) -> Result<()> {
    registry.submit(U256::from(task_id), content_hash).await?;
    info!("solution submitted for task {task_id}");

    let now = chrono::Utc::now().timestamp() as u64;
    tasks.add_submission(
        task_id,
        Submission {
            content_hash: content_hash.to_string(),
            submitted_by,
            submitted_at: now,
        },
    )?;

    Ok(())
}

/// Reveal the committed judge style.
pub async fn reveal_style(
    core: &TaskVaultClient,
    task_id: u64,
    style: &str,
    salt: &str,
) -> Result<()> {
    core.reveal_style(U256::from(task_id), style, salt).await?;
    info!("style revealed for task {task_id}");
    Ok(())
}
