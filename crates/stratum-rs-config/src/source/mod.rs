//! Value sources feeding the source chain.
//!
//! A source produces a mapping of raw YAML values keyed by field name. The
//! built-in sources are [`InitSource`] (explicit values) and [`FileSource`]
//! (a YAML file on disk); models may add their own by implementing
//! [`ValueSource`].

mod file;
mod init;
mod utils;

pub use file::FileSource;
pub use init::InitSource;

use crate::ConfigError;
use serde_yaml::Value;
use std::fmt;

/// Raw mapping from field key to arbitrary YAML value.
pub type RawMap = serde_yaml::Mapping;

/// A named provider of raw config values.
///
/// `load` is called once per model construction, when the chain runs.
/// `Display` must describe the source for debugging without dumping
/// file contents.
pub trait ValueSource: fmt::Display + fmt::Debug {
    /// Short identity used in logs and layer metadata.
    fn name(&self) -> &str;

    /// Produce this source's contribution.
    fn load(&self) -> Result<RawMap, ConfigError>;
}

/// Name of the YAML node kind, used in error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Render a value on one line in flow style: `{'a': 1, 'b': [true, null]}`.
pub(crate) fn write_flow(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(flag) => write!(f, "{flag}"),
        Value::Number(number) => write!(f, "{number}"),
        Value::String(text) => write!(f, "'{}'", text.replace('\'', "\\'")),
        Value::Sequence(items) => {
            f.write_str("[")?;
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write_flow(f, item)?;
            }
            f.write_str("]")
        }
        Value::Mapping(map) => write_flow_map(f, map),
        Value::Tagged(tagged) => {
            write!(f, "{} ", tagged.tag)?;
            write_flow(f, &tagged.value)
        }
    }
}

pub(crate) fn write_flow_map(f: &mut fmt::Formatter<'_>, map: &RawMap) -> fmt::Result {
    f.write_str("{")?;
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write_flow(f, key)?;
        f.write_str(": ")?;
        write_flow(f, value)?;
    }
    f.write_str("}")
}

/// Human-readable rendering of a mapping key for logs and layer metadata.
pub(crate) fn key_label(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_else(|_| kind_name(other).to_string()),
    }
}
