use ethers::types::U256;
use sha2::{Digest, Sha256};

/// Scope label shared by every proof request this deployment emits.
pub const SCOPE_NAME: &str = "taskvault-ai";

/// Derive the 256-bit scope identifier binding a proof request to an
/// endpoint. Both inputs are digested separately before the combining
/// digest, so ("ab", "c") and ("a", "bc") can never collide.
///
/// The proof-request builder and the on-chain validator must agree on
/// this construction byte for byte; a divergence rejects every proof
/// as wrong-scope.
pub fn derive_scope(endpoint: &str, scope_name: &str) -> U256 {
    let endpoint_digest = Sha256::digest(endpoint.as_bytes());
    let name_digest = Sha256::digest(scope_name.as_bytes());

    let mut hasher = Sha256::new();
    hasher.update(endpoint_digest);
    hasher.update(name_digest);
    U256::from_big_endian(&hasher.finalize())
}

/// Canonical verification endpoint for a task. Fixed before the first
/// proof request is generated: changing the rule afterwards invalidates
/// every in-flight proof for the task.
pub fn verification_endpoint(base_url: &str, task_id: u64) -> String {
    format!("{}/api/verify/{}", base_url.trim_end_matches('/'), task_id)
}
