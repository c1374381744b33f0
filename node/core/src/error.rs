use thiserror::Error;

/// Local validation failures. None of these are retried: the caller
/// rejects the operation and surfaces the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// More than 40 countries requested. Rejected before packing,
    /// never silently truncated.
    #[error("invalid country selection: {count} countries exceeds the 40 slot limit")]
    InvalidCountrySelection { count: usize },

    /// A persisted verification config failed to parse. Surfaced to the
    /// caller, never auto-corrected.
    #[error("malformed verification config: {0}")]
    MalformedConfig(String),

    /// Target network is outside the recognized set. Fatal, no retry.
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),
}
