mod workflow;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use ethers::types::{Address, U256};
use taskvault_core::contracts::{connect, MockTokenClient, RegistryClient, TaskVaultClient};
use taskvault_core::countries::Country;
use taskvault_core::network::NetworkConfig;
use taskvault_core::store::{DeploymentStore, TaskStore};
use taskvault_core::types::TaskType;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(name = "taskvault-deployer")]
#[clap(about = "TaskVault contract deployment and interaction")]
struct Args {
    #[clap(short, long, env = "TASKVAULT_NETWORK", default_value = "sepolia",
        value_parser = clap::builder::PossibleValuesParser::new(NetworkConfig::RECOGNIZED))]
    network: String,

    #[clap(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: String,

    #[clap(long, env = "ALCHEMY_API_KEY")]
    alchemy_key: String,

    #[clap(long, env = "TASKVAULT_BASE_URL")]
    base_url: String,

    #[clap(long, default_value = "./taskvault.db")]
    db_path: String,

    #[clap(long, default_value = "./artifacts")]
    artifacts_dir: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy TaskVaultCore, SubmissionRegistry and PrizeVault in order
    Deploy {
        #[clap(long, env = "IDENTITY_HUB")]
        identity_hub: Option<String>,
        #[clap(long)]
        with_mock_token: bool,
    },
    /// Create a task on-chain and record it
    CreateTask {
        #[clap(long)]
        task_id: u64,
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        description: String,
        #[clap(long = "criterion", required = true)]
        criteria: Vec<String>,
        /// Deadline as unix seconds
        #[clap(long)]
        deadline: u64,
        #[clap(long)]
        token: String,
        /// Prize in token base units (decimal)
        #[clap(long)]
        prize: String,
        #[clap(long)]
        style: String,
        /// Hex salt; generated when omitted
        #[clap(long)]
        salt: Option<String>,
        #[clap(long, default_value = "18")]
        minimum_age: u64,
        /// Alpha-3 codes, repeatable
        #[clap(long = "exclude")]
        excluded: Vec<String>,
        #[clap(long, value_enum, default_value = "content-delivery")]
        task_type: TaskTypeArg,
        #[clap(long, default_value = "10")]
        max_per_time: u64,
        #[clap(long, default_value = "100")]
        max_per_day: u64,
    },
    /// Submit a solution content hash for a task
    Submit {
        #[clap(long)]
        task_id: u64,
        #[clap(long)]
        content_hash: String,
    },
    /// Reveal a committed judge style
    RevealStyle {
        #[clap(long)]
        task_id: u64,
        #[clap(long)]
        style: String,
        #[clap(long)]
        salt: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TaskTypeArg {
    TwitterInteract,
    ContentDelivery,
}

impl From<TaskTypeArg> for TaskType {
    fn from(arg: TaskTypeArg) -> Self {
        match arg {
            TaskTypeArg::TwitterInteract => TaskType::TwitterInteract,
            TaskTypeArg::ContentDelivery => TaskType::ContentDelivery,
        }
    }
}

fn contract_address(store: &DeploymentStore, network: &str, name: &str) -> Result<Address> {
    let record = store
        .network(network)?
        .ok_or_else(|| anyhow!("no deployments recorded for network {network}"))?;
    let addr = record
        .contracts
        .get(name)
        .ok_or_else(|| anyhow!("{name} not deployed on {network}"))?;
    addr.parse()
        .with_context(|| format!("bad recorded address for {name}: {addr}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Unknown network is fatal before any chain traffic.
    let network = NetworkConfig::resolve(&args.network, &args.alchemy_key)?;
    let client = connect(&network.rpc_url, &args.private_key, network.chain_id)?;

    let db = sled::open(&args.db_path)?;
    let deployments = DeploymentStore::open(&db)?;
    let tasks = TaskStore::open(&db)?;

    match args.command {
        Command::Deploy {
            identity_hub,
            with_mock_token,
        } => {
            let identity_hub = match identity_hub {
                Some(addr) => addr.parse().context("bad identity hub address")?,
                None => Address::zero(),
            };
            workflow::deploy(
                client,
                &deployments,
                &network,
                &args.artifacts_dir,
                identity_hub,
                &args.base_url,
                with_mock_token,
            )
            .await?;
            info!("deployment complete");
        }
        Command::CreateTask {
            task_id,
            title,
            description,
            criteria,
            deadline,
            token,
            prize,
            style,
            salt,
            minimum_age,
            excluded,
            task_type,
            max_per_time,
            max_per_day,
        } => {
            let core_addr = contract_address(&deployments, &network.name, "TaskVaultCore")?;
            let core = TaskVaultClient::new(core_addr, client.clone());

            let excluded_countries = excluded
                .iter()
                .map(|code| Country::new(code))
                .collect::<Result<Vec<_>, _>>()?;
            let salt = salt.unwrap_or_else(taskvault_core::commitment::random_salt);
            info!("using salt {salt} for style commitment");

            let token_address: Address = token.parse().context("bad token address")?;
            let mock_token = deployments
                .network(&network.name)?
                .and_then(|record| workflow::mock_token_address(&record, token_address))
                .map(|addr| MockTokenClient::new(addr, client.clone()));

            workflow::create_task(
                &core,
                &tasks,
                mock_token,
                workflow::CreateTaskParams {
                    task_id,
                    title,
                    description,
                    criteria,
                    deadline,
                    token_address,
                    prize_amount: U256::from_dec_str(&prize).context("bad prize amount")?,
                    judge_style: style,
                    salt,
                    minimum_age,
                    excluded_countries,
                    ofac_enabled: [true, false, false],
                    task_type: task_type.into(),
                    max_per_time: U256::from(max_per_time),
                    max_per_day: U256::from(max_per_day),
                    base_url: args.base_url.clone(),
                    created_by: client.address(),
                },
            )
            .await?;
        }
        Command::Submit {
            task_id,
            content_hash,
        } => {
            let registry_addr =
                contract_address(&deployments, &network.name, "SubmissionRegistry")?;
            let registry = RegistryClient::new(registry_addr, client.clone());
            workflow::submit_solution(&registry, &tasks, task_id, &content_hash, client.address())
                .await?;
        }
        Command::RevealStyle {
            task_id,
            style,
            salt,
        } => {
            let core_addr = contract_address(&deployments, &network.name, "TaskVaultCore")?;
            let core = TaskVaultClient::new(core_addr, client.clone());
            workflow::reveal_style(&core, task_id, &style, &salt).await?;
        }
    }

    Ok(())
}
