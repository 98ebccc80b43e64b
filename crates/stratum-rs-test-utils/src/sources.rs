use std::fmt;
use std::io;
use std::path::PathBuf;
use stratum_rs_config::{ConfigError, RawMap, ValueSource};

/// Source returning a fixed mapping.
#[derive(Debug, Clone)]
pub struct StubSource {
    name: String,
    values: RawMap,
}

impl StubSource {
    pub fn new(name: impl Into<String>, values: RawMap) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build the mapping from inline YAML.
    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Self {
        Self::new(name, serde_yaml::from_str(yaml).expect("stub yaml"))
    }
}

impl fmt::Display for StubSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StubSource(name='{}')", self.name)
    }
}

impl ValueSource for StubSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<RawMap, ConfigError> {
        Ok(self.values.clone())
    }
}

/// Source that always fails as if its backing store were unreachable.
///
/// The error is a `ReadFailed` whose path is the source name.
#[derive(Debug, Clone)]
pub struct FailingSource {
    name: String,
}

impl FailingSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for FailingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FailingSource(name='{}')", self.name)
    }
}

impl ValueSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<RawMap, ConfigError> {
        Err(ConfigError::ReadFailed {
            path: PathBuf::from(&self.name),
            source: io::Error::new(io::ErrorKind::NotConnected, "source unavailable"),
        })
    }
}
