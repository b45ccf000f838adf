//! Config store, the leaf component every other module reads through.
//!
//! Holds two mappings in the host's keyed state:
//! - config entries: content-addressed key → unsigned integer or address
//! - module bindings: logical module name → current module address
//!
//! It also keeps the module directory: which addresses carry live module code
//! and of what kind. Callers depend on a logical module name and resolve it at
//! call time, so a passed upgrade can swap the implementation behind a name
//! without touching any dependent.
//!
//! Only the governance engine may write.

pub mod error;
pub mod modules;
pub mod store;

pub use error::ConfigError;
pub use modules::ModuleKind;
pub use store::ConfigStore;
