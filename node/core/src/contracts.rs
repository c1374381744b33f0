use crate::config::VerificationConfig;
use anyhow::Result;
use ethers::{
    contract::abigen,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, H256, U256},
};
use std::sync::Arc;

// Generate contract bindings. The argument lists are the wire contract:
// any reordering corrupts field meaning silently, so calls only go
// through the generated typed methods.
abigen!(
    TaskVaultCore,
    r#"[
        function createTask(string[] criteria, bytes32 styleCommit, uint256 deadline, address tokenAddress, uint256 prizeAmount, uint256 scope, uint256 attestationId, bool olderThanEnabled, uint256 olderThan, bool forbiddenCountriesEnabled, uint256[4] forbiddenCountriesListPacked, bool[3] ofacEnabled, uint256 maxPerTime, uint256 maxPerDay) external
        function revealStyle(uint256 taskId, string style, string salt) external
        function setSubmissionRegistry(address registry) external
        function setPrizeVault(address vault) external
        function approvePrizeToken(address token) external
    ]"#
);

abigen!(
    SubmissionRegistry,
    r#"[
        function submit(uint256 taskId, string contentHash) external
        function verifySelfProof(uint256[2] a, uint256[2][2] b, uint256[2] c, uint256[] pubSignals, uint256 taskId) external
    ]"#
);

abigen!(
    Erc20Mock,
    r#"[
        function mint(address to, uint256 amount) external
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Connect a signing client to an RPC endpoint.
pub fn connect(rpc_url: &str, private_key: &str, chain_id: u64) -> Result<Arc<Client>> {
    let provider = Provider::<Http>::try_from(rpc_url)?;
    let key = private_key.strip_prefix("0x").unwrap_or(private_key);
    let wallet = key.parse::<LocalWallet>()?.with_chain_id(chain_id);
    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Groth16 proof in the shape the registry contract expects. The b
/// coordinates arrive already swapped into contract order.
#[derive(Debug, Clone)]
pub struct SelfProof {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub pub_signals: Vec<U256>,
}

/// TaskVaultCore contract client
#[derive(Clone)]
pub struct TaskVaultClient {
    contract: TaskVaultCore<Client>,
}

impl TaskVaultClient {
    pub fn new(contract_addr: Address, client: Arc<Client>) -> Self {
        let contract = TaskVaultCore::new(contract_addr, client);
        Self { contract }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Create a task. The verification config is exploded into the
    /// positional tuple here, in exactly the ABI order.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_task(
        &self,
        criteria: Vec<String>,
        style_commit: H256,
        deadline: u64,
        token_address: Address,
        prize_amount: U256,
        verification: &VerificationConfig,
        max_per_time: U256,
        max_per_day: U256,
    ) -> Result<()> {
        self.contract
            .create_task(
                criteria,
                style_commit.to_fixed_bytes(),
                U256::from(deadline),
                token_address,
                prize_amount,
                verification.scope,
                verification.attestation_id,
                verification.older_than_enabled,
                verification.older_than,
                verification.forbidden_countries_enabled,
                verification.forbidden_countries_list_packed,
                verification.ofac_enabled,
                max_per_time,
                max_per_day,
            )
            .send()
            .await?
            .await?;

        Ok(())
    }

    /// Reveal the committed judge style after the deadline.
    pub async fn reveal_style(&self, task_id: U256, style: &str, salt: &str) -> Result<()> {
        self.contract
            .reveal_style(task_id, style.to_string(), salt.to_string())
            .send()
            .await?
            .await?;

        Ok(())
    }

    pub async fn set_submission_registry(&self, registry: Address) -> Result<()> {
        self.contract
            .set_submission_registry(registry)
            .send()
            .await?
            .await?;

        Ok(())
    }

    pub async fn set_prize_vault(&self, vault: Address) -> Result<()> {
        self.contract.set_prize_vault(vault).send().await?.await?;

        Ok(())
    }

    pub async fn approve_prize_token(&self, token: Address) -> Result<()> {
        self.contract
            .approve_prize_token(token)
            .send()
            .await?
            .await?;

        Ok(())
    }
}

/// SubmissionRegistry contract client
#[derive(Clone)]
pub struct RegistryClient {
    contract: SubmissionRegistry<Client>,
}

impl RegistryClient {
    pub fn new(contract_addr: Address, client: Arc<Client>) -> Self {
        let contract = SubmissionRegistry::new(contract_addr, client);
        Self { contract }
    }

    /// Submit a solution's content hash for a task.
    pub async fn submit(&self, task_id: U256, content_hash: &str) -> Result<()> {
        self.contract
            .submit(task_id, content_hash.to_string())
            .send()
            .await?
            .await?;

        Ok(())
    }

    /// Relay an identity proof to the on-chain verifier. Returns the
    /// transaction hash once mined.
    pub async fn verify_self_proof(&self, proof: SelfProof, task_id: U256) -> Result<H256> {
        let receipt = self
            .contract
            .verify_self_proof(proof.a, proof.b, proof.c, proof.pub_signals, task_id)
            .send()
            .await?
            .await?;

        let receipt =
            receipt.ok_or_else(|| anyhow::anyhow!("verification transaction dropped"))?;
        Ok(receipt.transaction_hash)
    }
}

/// Mock prize-token client for test flows.
#[derive(Clone)]
pub struct MockTokenClient {
    contract: Erc20Mock<Client>,
}

impl MockTokenClient {
    pub fn new(contract_addr: Address, client: Arc<Client>) -> Self {
        let contract = Erc20Mock::new(contract_addr, client);
        Self { contract }
    }

    pub async fn mint(&self, to: Address, amount: U256) -> Result<()> {
        self.contract.mint(to, amount).send().await?.await?;

        Ok(())
    }

    pub async fn approve(&self, spender: Address, amount: U256) -> Result<()> {
        self.contract.approve(spender, amount).send().await?.await?;

        Ok(())
    }
}
