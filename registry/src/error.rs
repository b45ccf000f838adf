use dpos_config::ConfigError;
use dpos_store::StoreError;
use dpos_types::{Address, Amount, ErrorCode, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0} already holds an active or unreleased candidacy")]
    AlreadyRegistered(Address),

    #[error("deposit must be exactly {expected}, got {attached}")]
    InvalidDeposit { expected: Amount, attached: Amount },

    #[error("{0} is not an active candidate")]
    NotActiveCandidate(Address),

    #[error("{0} was ousted as malicious")]
    Malicious(Address),

    #[error("{0} may not adjust producer weights")]
    Unauthorized(Address),

    #[error("{0} has not unregistered")]
    NotUnregistered(Address),

    #[error("deposit is locked until {unlocks_at}")]
    LockTimeNotElapsed { unlocks_at: Timestamp },

    #[error("{0} is not a known candidate")]
    UnknownProducer(Address),

    #[error("weight overflow on {0}")]
    WeightOverflow(Address),

    #[error("weight underflow on {0}")]
    WeightUnderflow(Address),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyRegistered(_) => ErrorCode::AlreadyRegistered,
            Self::InvalidDeposit { .. } => ErrorCode::InvalidDeposit,
            Self::NotActiveCandidate(_) | Self::UnknownProducer(_) => ErrorCode::UnknownProducer,
            Self::Malicious(_) | Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::NotUnregistered(_) => ErrorCode::NotUnregistered,
            Self::LockTimeNotElapsed { .. } => ErrorCode::LockTimeNotElapsed,
            Self::WeightOverflow(_) | Self::WeightUnderflow(_) => ErrorCode::Overflow,
            Self::Config(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }
}
