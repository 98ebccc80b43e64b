//! Typed config models resolved from a source chain.

use crate::source::key_label;
use crate::{
    ConfigError, FileEncoding, FileSource, InitSource, RawMap, SourceChain, SourceLayer,
    SourceOverrides, SourceSettings, ValidationErrors, ValueSource,
};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

/// A config type whose fields are resolved from layered sources.
///
/// Field typing, coercion and defaults come from the type's `Deserialize`
/// implementation. The associated functions below let a type declare its
/// source settings and reorder, drop or add sources.
///
/// ```no_run
/// use serde::Deserialize;
/// use stratum_rs_config::{ConfigModel, SourceSettings};
///
/// #[derive(Debug, Deserialize)]
/// struct AppConfig {
///     host: String,
///     #[serde(default)]
///     port: u16,
/// }
///
/// impl ConfigModel for AppConfig {
///     fn source_settings() -> SourceSettings {
///         SourceSettings::from_file("~/.app", "config.yaml")
///     }
/// }
///
/// # fn main() -> Result<(), stratum_rs_config::ConfigError> {
/// let _config = AppConfig::builder().set("port", 8080).load()?;
/// # Ok(())
/// # }
/// ```
pub trait ConfigModel: DeserializeOwned + Sized {
    /// Settings declared for this type; per-load overrides take precedence.
    fn source_settings() -> SourceSettings {
        SourceSettings::default()
    }

    /// Sources to merge, highest priority first.
    fn customise_sources(init: InitSource, file: FileSource) -> Vec<Box<dyn ValueSource>> {
        vec![Box::new(init), Box::new(file)]
    }

    /// Invariants that cannot be expressed through `Deserialize`.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn builder() -> ConfigBuilder<Self> {
        ConfigBuilder::new()
    }

    /// Load using only the declared settings and no explicit values.
    fn load() -> Result<Self, ConfigError> {
        Self::builder().load()
    }

    /// Load with explicit values taking precedence over the file.
    fn load_with(values: RawMap) -> Result<Self, ConfigError> {
        Self::builder().values(values).load()
    }
}

/// A loaded model together with what each source contributed.
#[derive(Debug, Clone)]
pub struct ResolvedConfig<T> {
    pub config: T,
    /// One entry per source, highest priority first.
    pub layers: Vec<SourceLayer>,
}

/// Per-load overrides and explicit values for a [`ConfigModel`].
pub struct ConfigBuilder<T> {
    overrides: SourceOverrides,
    values: RawMap,
    _model: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for ConfigBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("overrides", &self.overrides)
            .field("values", &self.values)
            .finish()
    }
}

impl<T: ConfigModel> Default for ConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConfigModel> ConfigBuilder<T> {
    pub fn new() -> Self {
        Self {
            overrides: SourceOverrides::default(),
            values: RawMap::new(),
            _model: PhantomData,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.overrides.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.overrides.file_name = Some(file_name.into());
        self
    }

    pub fn folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.overrides.folder = Some(folder.into());
        self
    }

    pub fn encoding(mut self, encoding: FileEncoding) -> Self {
        self.overrides.encoding = Some(encoding);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.overrides.prefix = Some(prefix.into());
        self
    }

    /// Replace all overrides at once.
    pub fn overrides(mut self, overrides: SourceOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set one explicit value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(Value::String(key.into()), value.into());
        self
    }

    /// Set one explicit value from any serializable type.
    pub fn try_set(
        mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<Self, ConfigError> {
        let key = key.into();
        let value = serde_yaml::to_value(value).map_err(|source| ConfigError::InvalidValue {
            key: key.clone(),
            source,
        })?;
        self.values.insert(Value::String(key), value);
        Ok(self)
    }

    /// Add explicit values; later calls win per key.
    pub fn values(mut self, values: RawMap) -> Self {
        for (key, value) in values {
            self.values.insert(key, value);
        }
        self
    }

    /// Settings after applying this builder's overrides to the declared ones.
    pub fn settings(&self) -> SourceSettings {
        T::source_settings().resolve(&self.overrides)
    }

    /// Build the chain this load would evaluate.
    pub fn chain(&self) -> SourceChain {
        let settings = self.settings();
        debug!(
            "resolved source settings (case_sensitive={}, folder={:?}, file_name={:?}, encoding={}, prefix={:?})",
            settings.case_sensitive,
            settings.folder,
            settings.file_name,
            settings.encoding,
            settings.prefix
        );
        let init = InitSource::new(self.values.clone());
        let file = FileSource::new(&settings);
        SourceChain::new(T::customise_sources(init, file))
    }

    pub fn load(self) -> Result<T, ConfigError> {
        Ok(self.load_layered()?.config)
    }

    /// Load and report the contribution of every source.
    pub fn load_layered(self) -> Result<ResolvedConfig<T>, ConfigError> {
        let resolved = self.chain().resolve_layered()?;
        let config = config_from_values(resolved.values)?;
        Ok(ResolvedConfig {
            config,
            layers: resolved.layers,
        })
    }
}

/// Hand the merged values to the model's `Deserialize` implementation.
///
/// Top-level keys that are not strings are passed on in string form so they
/// never bind to a field by position.
fn config_from_values<T: ConfigModel>(values: RawMap) -> Result<T, ConfigError> {
    let fields: RawMap = values
        .into_iter()
        .map(|(key, value)| match key {
            Value::String(_) => (key, value),
            other => (Value::String(key_label(&other)), value),
        })
        .collect();
    let config: T = serde_path_to_error::deserialize(Value::Mapping(fields))
        .map_err(|err| ConfigError::Validation(ValidationErrors::from_decode(&err)))?;
    config.validate()?;
    Ok(config)
}
