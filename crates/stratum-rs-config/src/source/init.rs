//! Source wrapping explicitly supplied values.

use super::{RawMap, ValueSource, write_flow_map};
use crate::ConfigError;
use log::debug;
use std::fmt;

/// Values passed at construction, returned verbatim.
#[derive(Debug, Clone, Default)]
pub struct InitSource {
    values: RawMap,
}

impl InitSource {
    pub fn new(values: RawMap) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &RawMap {
        &self.values
    }
}

impl ValueSource for InitSource {
    fn name(&self) -> &str {
        "init"
    }

    fn load(&self) -> Result<RawMap, ConfigError> {
        debug!("init source contributes {} keys", self.values.len());
        Ok(self.values.clone())
    }
}

impl fmt::Display for InitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitSource(init_kwargs=")?;
        write_flow_map(f, &self.values)?;
        f.write_str(")")
    }
}
