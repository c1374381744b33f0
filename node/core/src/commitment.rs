use ethers::types::H256;
use ethers::utils::keccak256;
use rand::RngCore;

/// Commit judges to their evaluation style and the criteria before any
/// submission is seen. The pre-image is revealed later to prove the
/// judgment was not tailored post-hoc.
pub fn style_commitment(criteria: &[String], judge_style: &str, salt: &str) -> H256 {
    let message = format!("{}:{}:{}", criteria.join("|"), judge_style, salt);
    H256::from(keccak256(message.as_bytes()))
}

/// Commitment checked by the on-chain reveal: keccak over the packed
/// concatenation of style and salt.
pub fn reveal_commitment(judge_style: &str, salt: &str) -> H256 {
    let mut packed = Vec::with_capacity(judge_style.len() + salt.len());
    packed.extend_from_slice(judge_style.as_bytes());
    packed.extend_from_slice(salt.as_bytes());
    H256::from(keccak256(&packed))
}

/// Fresh hex salt for a new commitment.
pub fn random_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
