mod api;

use anyhow::{Context, Result};
use api::AppState;
use clap::Parser;
use std::sync::Arc;
use taskvault_core::contracts::{connect, RegistryClient};
use taskvault_core::store::TaskStore;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[clap(name = "taskvault-gateway")]
#[clap(about = "TaskVault HTTP gateway - task records and proof relay")]
struct Args {
    #[clap(short, long, default_value = "8080")]
    port: u16,

    #[clap(long, default_value = "./taskvault.db")]
    db_path: String,

    /// Public base URL proof requests are generated against
    #[clap(long, env = "TASKVAULT_BASE_URL")]
    base_url: String,

    #[clap(long, env = "RPC_URL")]
    rpc: Option<String>,

    #[clap(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    #[clap(long, env = "SUBMISSION_REGISTRY")]
    registry: Option<String>,

    #[clap(long, env = "CHAIN_ID", default_value = "44787")]
    chain_id: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let db = sled::open(&args.db_path)?;
    let tasks = TaskStore::open(&db)?;

    let registry = match (&args.rpc, &args.private_key, &args.registry) {
        (Some(rpc), Some(key), Some(addr)) => {
            let client = connect(rpc, key, args.chain_id)?;
            let addr = addr.parse().context("bad registry address")?;
            info!("proof relay enabled against registry {addr:?}");
            Some(RegistryClient::new(addr, client))
        }
        _ => {
            warn!("no chain credentials, proof relay disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        tasks,
        registry,
        base_url: args.base_url,
    });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("gateway listening on {addr}");

    axum::Server::bind(&addr)
        .serve(api::routes(state).into_make_service())
        .await?;

    Ok(())
}
