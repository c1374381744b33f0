use crate::countries::{pack_countries, DEFAULT_SANCTIONED};
use crate::error::VaultError;
use crate::scope::derive_scope;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Identity-verification gates for a task, in the exact field widths the
/// chain stores. Immutable once constructed.
///
/// `forbidden_countries_list_packed` always has four words regardless of
/// how many countries are excluded. When `forbidden_countries_enabled`
/// is false the words are conventionally zero, but callers must not rely
/// on that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationConfig {
    pub scope: U256,
    pub attestation_id: U256,
    pub older_than_enabled: bool,
    pub older_than: U256,
    pub forbidden_countries_enabled: bool,
    pub forbidden_countries_list_packed: [U256; 4],
    pub ofac_enabled: [bool; 3],
}

/// Storage form of [`VerificationConfig`]: every 256-bit field as its
/// base-10 decimal string. The arrays are Vecs so a stored document with
/// the wrong arity is representable and rejected at deserialize time
/// instead of being silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedVerificationConfig {
    pub scope: String,
    pub attestation_id: String,
    pub older_than_enabled: bool,
    pub older_than: String,
    pub forbidden_countries_enabled: bool,
    pub forbidden_countries_list_packed: Vec<String>,
    pub ofac_enabled: Vec<bool>,
}

impl VerificationConfig {
    /// The single attestation scheme accepted today.
    pub const ATTESTATION_ID: u64 = 1;

    /// Deployment-time default: age 18 gate, the sanctioned-country
    /// exclusion list, primary OFAC check only.
    pub fn default_for_endpoint(endpoint: &str, scope_name: &str) -> Result<Self, VaultError> {
        Ok(Self {
            scope: derive_scope(endpoint, scope_name),
            attestation_id: U256::from(Self::ATTESTATION_ID),
            older_than_enabled: true,
            older_than: U256::from(18u64),
            forbidden_countries_enabled: true,
            forbidden_countries_list_packed: pack_countries(&DEFAULT_SANCTIONED)?,
            ofac_enabled: [true, false, false],
        })
    }

    pub fn serialize(&self) -> SerializedVerificationConfig {
        SerializedVerificationConfig {
            scope: self.scope.to_string(),
            attestation_id: self.attestation_id.to_string(),
            older_than_enabled: self.older_than_enabled,
            older_than: self.older_than.to_string(),
            forbidden_countries_enabled: self.forbidden_countries_enabled,
            forbidden_countries_list_packed: self
                .forbidden_countries_list_packed
                .iter()
                .map(|word| word.to_string())
                .collect(),
            ofac_enabled: self.ofac_enabled.to_vec(),
        }
    }
}

impl SerializedVerificationConfig {
    pub fn deserialize(&self) -> Result<VerificationConfig, VaultError> {
        if self.forbidden_countries_list_packed.len() != 4 {
            return Err(VaultError::MalformedConfig(format!(
                "packed country list has {} words, expected 4",
                self.forbidden_countries_list_packed.len()
            )));
        }
        if self.ofac_enabled.len() != 3 {
            return Err(VaultError::MalformedConfig(format!(
                "ofac list has {} flags, expected 3",
                self.ofac_enabled.len()
            )));
        }

        let mut packed = [U256::zero(); 4];
        for (word, value) in packed
            .iter_mut()
            .zip(&self.forbidden_countries_list_packed)
        {
            *word = parse_u256("forbiddenCountriesListPacked", value)?;
        }

        let mut ofac = [false; 3];
        ofac.copy_from_slice(&self.ofac_enabled);

        Ok(VerificationConfig {
            scope: parse_u256("scope", &self.scope)?,
            attestation_id: parse_u256("attestationId", &self.attestation_id)?,
            older_than_enabled: self.older_than_enabled,
            older_than: parse_u256("olderThan", &self.older_than)?,
            forbidden_countries_enabled: self.forbidden_countries_enabled,
            forbidden_countries_list_packed: packed,
            ofac_enabled: ofac,
        })
    }
}

fn parse_u256(field: &str, value: &str) -> Result<U256, VaultError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VaultError::MalformedConfig(format!(
            "{field} is not a non-negative base-10 integer: {value:?}"
        )));
    }
    U256::from_dec_str(value).map_err(|e| {
        VaultError::MalformedConfig(format!("{field} does not fit in 256 bits: {e}"))
    })
}
