use dpos_config::ConfigError;
use dpos_registry::RegistryError;
use dpos_store::StoreError;
use dpos_types::{Address, Amount, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DelegationError {
    #[error("{0} already has an open vote")]
    AlreadyVoting(Address),

    #[error("producer list is empty")]
    EmptyTargets,

    #[error("producer {0} listed more than once")]
    DuplicateTargets(Address),

    #[error("stake {attached} is below the minimum {minimum}")]
    InvalidStake { minimum: Amount, attached: Amount },

    #[error("{0} is not an active producer")]
    UnknownProducer(Address),

    #[error("{0} is not a registered proxy")]
    UnknownProxy(Address),

    #[error("{0} is already a proxy")]
    AlreadyProxy(Address),

    #[error("{0} has nothing to unvote")]
    NothingToUnvote(Address),

    #[error("weight overflow on proxy {0}")]
    WeightOverflow(Address),

    #[error("weight underflow on proxy {0}")]
    WeightUnderflow(Address),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DelegationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyVoting(_) => ErrorCode::AlreadyVoting,
            Self::EmptyTargets => ErrorCode::EmptyTargets,
            Self::DuplicateTargets(_) => ErrorCode::DuplicateTargets,
            Self::InvalidStake { .. } => ErrorCode::InvalidStake,
            Self::UnknownProducer(_) => ErrorCode::UnknownProducer,
            Self::UnknownProxy(_) => ErrorCode::UnknownProxy,
            Self::AlreadyProxy(_) => ErrorCode::AlreadyProxy,
            Self::NothingToUnvote(_) => ErrorCode::NothingToUnvote,
            Self::WeightOverflow(_) | Self::WeightUnderflow(_) => ErrorCode::Overflow,
            Self::Registry(e) => e.code(),
            Self::Config(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }
}
