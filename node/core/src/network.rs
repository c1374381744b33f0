use crate::error::VaultError;

/// RPC target resolved from a network name. The recognized set is
/// closed: anything else is a configuration error, not a retry case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

impl NetworkConfig {
    pub const RECOGNIZED: [&'static str; 2] = ["sepolia", "celo"];

    pub fn resolve(name: &str, alchemy_key: &str) -> Result<Self, VaultError> {
        let (chain_id, rpc_url) = match name {
            "sepolia" => (
                11155111,
                format!("https://eth-sepolia.g.alchemy.com/v2/{alchemy_key}"),
            ),
            "celo" => (
                // Alfajores testnet
                44787,
                format!("https://celo-alfajores.g.alchemy.com/v2/{alchemy_key}"),
            ),
            other => return Err(VaultError::UnsupportedNetwork(other.to_string())),
        };

        Ok(Self {
            name: name.to_string(),
            chain_id,
            rpc_url,
        })
    }
}
