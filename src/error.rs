//! Error types for guard operations

/// Guard-specific error type
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The identity capability was never wired up. This is a fatal
    /// misconfiguration of the hosting application, not a runtime denial.
    #[error("No identity source configured: call set_identity_source after the identity client initializes")]
    MissingIdentitySource,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GuardError>;
