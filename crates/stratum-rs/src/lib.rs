//! Public surface for Stratum.
//!
//! This crate re-exports the config building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use stratum_rs_config as config;

pub use stratum_rs_config::{
    ConfigBuilder, ConfigError, ConfigModel, FileEncoding, FileSource, InitSource, RawMap,
    SourceChain, SourceSettings, ValidationErrors, ValueSource,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
