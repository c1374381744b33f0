pub mod commitment;
pub mod config;
pub mod contracts;
pub mod countries;
pub mod error;
pub mod network;
pub mod scope;
pub mod status;
pub mod store;
pub mod types;

pub use config::{SerializedVerificationConfig, VerificationConfig};
pub use countries::{pack_countries, unpack_countries, Country, MAX_EXCLUDED_COUNTRIES};
pub use error::VaultError;
pub use scope::{derive_scope, verification_endpoint, SCOPE_NAME};
pub use status::TaskStatus;
