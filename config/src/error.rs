use dpos_store::StoreError;
use dpos_types::{Address, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not allowed to modify the config store")]
    Unauthorized(Address),

    #[error("module {0} has no live code")]
    ModuleRetired(Address),

    #[error("no module bound under {0}")]
    Unbound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::ModuleRetired(_) | Self::Unbound(_) => ErrorCode::ModuleRetired,
            Self::Store(e) => e.code(),
        }
    }
}
