//! Typed configuration resolved from layered sources.
//!
//! A [`ConfigModel`] is populated by merging the mappings produced by an
//! ordered list of [`ValueSource`]s: by default explicit values
//! ([`InitSource`]) over a YAML file ([`FileSource`]). Nested mappings are
//! merged key by key through the [`SourceChain`]; everything else is replaced
//! by the higher-priority source. The merged mapping is then deserialized and
//! validated into the model type.

mod chain;
mod error;
mod model;
mod settings;
mod source;

/// Source chain and merge helpers.
pub use chain::{ResolvedLayers, SourceChain, SourceLayer, deep_merge, merge_layers};
/// Public error types returned by loading and validation.
pub use error::{ConfigError, FieldError, ValidationErrors};
/// Model trait and builder.
pub use model::{ConfigBuilder, ConfigModel, ResolvedConfig};
/// Source settings and overrides.
pub use settings::{FileEncoding, SourceOverrides, SourceSettings};
/// Source trait and built-in sources.
pub use source::{FileSource, InitSource, RawMap, ValueSource};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
