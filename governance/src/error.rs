use dpos_config::ConfigError;
use dpos_registry::RegistryError;
use dpos_store::StoreError;
use dpos_types::{Address, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("{0} is not in the active producer set")]
    NotActiveProducer(Address),

    #[error("a proposal is already open")]
    ProposalPending,

    #[error("no proposal is open")]
    NoOpenProposal,

    #[error("the open proposal has expired")]
    ProposalExpired,

    #[error("{0} has already voted on this proposal")]
    AlreadyVoted(Address),

    #[error("invalid proposal payload: {0}")]
    InvalidPayload(String),

    #[error("{0} is not an active producer")]
    UnknownProducer(Address),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GovernanceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotActiveProducer(_) => ErrorCode::Unauthorized,
            Self::ProposalPending => ErrorCode::ProposalPending,
            Self::NoOpenProposal => ErrorCode::NoOpenProposal,
            Self::ProposalExpired => ErrorCode::ProposalExpired,
            Self::AlreadyVoted(_) => ErrorCode::AlreadyVoted,
            Self::InvalidPayload(_) => ErrorCode::InvalidPayload,
            Self::UnknownProducer(_) => ErrorCode::UnknownProducer,
            Self::Registry(e) => e.code(),
            Self::Config(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }
}
