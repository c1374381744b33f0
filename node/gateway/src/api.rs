use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskvault_core::commitment::style_commitment;
use taskvault_core::contracts::{RegistryClient, SelfProof};
use taskvault_core::countries::{pack_countries, Country};
use taskvault_core::scope::{derive_scope, verification_endpoint, SCOPE_NAME};
use taskvault_core::store::TaskStore;
use taskvault_core::types::{Submission, TaskRecord, TaskType};
use taskvault_core::{TaskStatus, VerificationConfig};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Gateway state. The registry client is optional: without chain
/// credentials the proof relay is disabled but task CRUD still works.
pub struct AppState {
    pub tasks: TaskStore,
    pub registry: Option<RegistryClient>,
    pub base_url: String,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/tasks", post(create_task).get(list_tasks))
        .route("/api/tasks/:id", get(get_task))
        .route("/api/tasks/:id/submissions", post(add_submission))
        .route("/api/verify/:task_id", post(verify_proof))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    task_id: u64,
    title: String,
    #[serde(default)]
    description: String,
    criteria: Vec<String>,
    /// Unix seconds
    deadline: u64,
    token_address: String,
    prize_amount: String,
    judge_style: String,
    salt: String,
    #[serde(default)]
    minimum_age: u64,
    #[serde(default)]
    excluded_countries: Vec<String>,
    #[serde(default)]
    ofac_enabled: Option<Vec<bool>>,
    task_type: TaskType,
    created_by: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskResponse {
    #[serde(flatten)]
    task: TaskRecord,
    status: TaskStatus,
    submission_count: usize,
}

impl TaskResponse {
    fn new(task: TaskRecord, now: u64) -> Self {
        let status = task.status(now);
        let submission_count = task.submissions.len();
        Self {
            task,
            status,
            submission_count,
        }
    }
}

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

fn build_record(state: &AppState, req: CreateTaskRequest) -> anyhow::Result<TaskRecord> {
    if !req.task_type.is_selectable() {
        anyhow::bail!("task type {:?} is not selectable", req.task_type);
    }

    let token_address: Address = req
        .token_address
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid token address"))?;
    let created_by: Address = req
        .created_by
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid creator address"))?;
    let prize_amount = U256::from_dec_str(&req.prize_amount)
        .map_err(|_| anyhow::anyhow!("invalid prize amount"))?;

    let excluded = req
        .excluded_countries
        .iter()
        .map(|code| Country::new(code))
        .collect::<Result<Vec<_>, _>>()?;

    let ofac = match req.ofac_enabled {
        Some(flags) if flags.len() == 3 => [flags[0], flags[1], flags[2]],
        Some(flags) => anyhow::bail!("ofac list has {} flags, expected 3", flags.len()),
        None => [true, false, false],
    };

    let endpoint = verification_endpoint(&state.base_url, req.task_id);
    let verification = VerificationConfig {
        scope: derive_scope(&endpoint, SCOPE_NAME),
        attestation_id: U256::from(VerificationConfig::ATTESTATION_ID),
        older_than_enabled: req.minimum_age > 0,
        older_than: U256::from(req.minimum_age),
        forbidden_countries_enabled: !excluded.is_empty(),
        forbidden_countries_list_packed: pack_countries(&excluded)?,
        ofac_enabled: ofac,
    };

    let style_commit = style_commitment(&req.criteria, &req.judge_style, &req.salt);

    Ok(TaskRecord {
        task_id: req.task_id,
        title: req.title,
        description: req.description,
        criteria: req.criteria,
        deadline: req.deadline,
        token_address,
        prize_amount: prize_amount.to_string(),
        style_commit,
        created_by,
        task_type: req.task_type,
        verification: verification.serialize(),
        submissions: Vec::new(),
    })
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    let record = match build_record(&state, req) {
        Ok(record) => record,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.tasks.create(&record) {
        Ok(()) => {
            info!("task {} created", record.task_id);
            (StatusCode::CREATED, Json(TaskResponse::new(record, now()))).into_response()
        }
        Err(e) => (StatusCode::CONFLICT, e.to_string()).into_response(),
    }
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.tasks.list() {
        Ok(tasks) => {
            let now = now();
            let tasks: Vec<TaskResponse> = tasks
                .into_iter()
                .map(|task| TaskResponse::new(task, now))
                .collect();
            Json(serde_json::json!({ "tasks": tasks })).into_response()
        }
        Err(e) => {
            error!("listing tasks failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch tasks").into_response()
        }
    }
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.tasks.get(id) {
        Ok(Some(task)) => Json(TaskResponse::new(task, now())).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "task not found").into_response(),
        Err(e) => {
            error!("fetching task {id} failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch task").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionRequest {
    content_hash: String,
    submitted_by: String,
}

async fn add_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<SubmissionRequest>,
) -> impl IntoResponse {
    let submitted_by: Address = match req.submitted_by.parse() {
        Ok(addr) => addr,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid submitter address").into_response(),
    };

    let submission = Submission {
        content_hash: req.content_hash,
        submitted_by,
        submitted_at: now(),
    };

    match state.tasks.add_submission(id, submission) {
        Ok(task) => Json(TaskResponse::new(task, now())).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest {
    proof: ProofBody,
    public_signals: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProofBody {
    a: Vec<String>,
    b: Vec<Vec<String>>,
    c: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    status: &'static str,
    tx_hash: String,
}

fn parse_proof(body: &ProofBody, signals: &[String]) -> anyhow::Result<SelfProof> {
    fn parse(value: &str) -> anyhow::Result<U256> {
        U256::from_dec_str(value).map_err(|_| anyhow::anyhow!("proof field is not decimal"))
    }

    if body.a.len() != 2 || body.c.len() != 2 {
        anyhow::bail!("proof a/c must have two coordinates");
    }
    if body.b.len() != 2 || body.b.iter().any(|pair| pair.len() != 2) {
        anyhow::bail!("proof b must be a 2x2 matrix");
    }

    // snarkjs emits b pairs in reversed order relative to the contract.
    Ok(SelfProof {
        a: [parse(&body.a[0])?, parse(&body.a[1])?],
        b: [
            [parse(&body.b[0][1])?, parse(&body.b[0][0])?],
            [parse(&body.b[1][1])?, parse(&body.b[1][0])?],
        ],
        c: [parse(&body.c[0])?, parse(&body.c[1])?],
        pub_signals: signals.iter().map(|s| parse(s)).collect::<anyhow::Result<_>>()?,
    })
}

async fn verify_proof(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<u64>,
    Json(req): Json<VerifyRequest>,
) -> impl IntoResponse {
    let registry = match &state.registry {
        Some(registry) => registry,
        None => {
            return (StatusCode::SERVICE_UNAVAILABLE, "proof relay disabled").into_response()
        }
    };

    match state.tasks.get(task_id) {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, "task not found").into_response(),
        Err(e) => {
            error!("fetching task {task_id} failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch task").into_response();
        }
    }

    let proof = match parse_proof(&req.proof, &req.public_signals) {
        Ok(proof) => proof,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match registry.verify_self_proof(proof, U256::from(task_id)).await {
        Ok(tx_hash) => {
            info!("verification relayed for task {task_id}: {tx_hash:?}");
            Json(VerifyResponse {
                status: "success",
                tx_hash: format!("{tx_hash:?}"),
            })
            .into_response()
        }
        Err(e) => {
            error!("verification failed for task {task_id}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "verification failed").into_response()
        }
    }
}
