use dpos_config::ConfigError;
use dpos_delegation::DelegationError;
use dpos_governance::GovernanceError;
use dpos_registry::RegistryError;
use dpos_store::StoreError;
use dpos_types::ErrorCode;
use dpos_utils::LoggingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("state store already holds a genesis")]
    AlreadyInitialised,

    #[error("state store holds no genesis")]
    NotInitialised,

    #[error("configuration error: {0}")]
    Settings(String),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Delegation(#[from] DelegationError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChainError {
    /// Failure class of a rejected operation.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyInitialised | Self::NotInitialised => ErrorCode::Storage,
            Self::Settings(_) | Self::Logging(_) => ErrorCode::InvalidPayload,
            Self::Config(e) => e.code(),
            Self::Registry(e) => e.code(),
            Self::Delegation(e) => e.code(),
            Self::Governance(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }
}
