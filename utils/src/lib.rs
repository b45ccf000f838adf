//! Shared utilities for the DPoS governance core.

pub mod logging;

pub use logging::{init_tracing, try_init_for_tests, LogFormat, LoggingError};
