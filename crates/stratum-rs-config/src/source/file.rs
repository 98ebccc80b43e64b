//! Source backed by a single YAML file.

use super::{RawMap, ValueSource, key_label, kind_name, utils};
use crate::{ConfigError, FileEncoding, SourceSettings};
use log::{debug, warn};
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Values read from `folder/file_name`.
///
/// A missing file, or settings without both a folder and a file name,
/// contribute nothing. Top-level keys are prefix-stripped and, unless the
/// source is case sensitive, lower-cased; nested keys are left alone.
///
/// Building the source does not touch the filesystem. The file is read on
/// every [`ValueSource::load`], so a chain that leaves this source out never
/// reports errors for the file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: Option<PathBuf>,
    encoding: FileEncoding,
    case_sensitive: bool,
    prefix: Option<String>,
}

impl FileSource {
    pub fn new(settings: &SourceSettings) -> Self {
        let path = match (&settings.folder, &settings.file_name) {
            (Some(folder), Some(file_name)) => Some(folder.join(file_name)),
            _ => None,
        };
        Self {
            path,
            encoding: settings.encoding,
            case_sensitive: settings.case_sensitive,
            prefix: settings.prefix.clone(),
        }
    }

    /// Configured path before home expansion.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn encoding(&self) -> FileEncoding {
        self.encoding
    }

    fn read(&self, path: &Path) -> Result<RawMap, ConfigError> {
        debug!(
            "loading config file (path={}, encoding={})",
            path.display(),
            self.encoding
        );
        let bytes = fs::read(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let contents = self
            .encoding
            .decode(bytes)
            .ok_or_else(|| ConfigError::Decode {
                path: path.to_path_buf(),
                encoding: self.encoding.to_string(),
            })?;
        let root: Value = if contents.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source,
            })?
        };
        match root {
            Value::Mapping(map) => Ok(self.normalize_keys(map)),
            other => Err(ConfigError::FileFormat {
                path: path.to_path_buf(),
                found: kind_name(&other),
            }),
        }
    }

    fn normalize_keys(&self, map: RawMap) -> RawMap {
        let mut normalized = RawMap::with_capacity(map.len());
        for (key, value) in map {
            let key = match key {
                Value::String(text) => Value::String(self.normalize_key(text)),
                other => other,
            };
            if normalized.contains_key(&key) {
                warn!(
                    "config file key collides after normalization, later entry wins (key={})",
                    key_label(&key)
                );
            }
            normalized.insert(key, value);
        }
        normalized
    }

    fn normalize_key(&self, key: String) -> String {
        let key = match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => match key.strip_prefix(prefix) {
                Some(stripped) => stripped.to_string(),
                None => key,
            },
            _ => key,
        };
        if self.case_sensitive {
            key
        } else {
            key.to_lowercase()
        }
    }
}

impl ValueSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self) -> Result<RawMap, ConfigError> {
        let Some(path) = self.path.as_deref() else {
            debug!("no config file configured");
            return Ok(RawMap::new());
        };
        let path = utils::expand_home(path);
        if !path.is_file() {
            debug!("config file missing, skipping (path={})", path.display());
            return Ok(RawMap::new());
        }
        self.read(&path)
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "FileSource(config_file='{}', ", path.display())?,
            None => f.write_str("FileSource(config_file=None, ")?,
        }
        write!(f, "config_file_encoding='{}')", self.encoding)
    }
}
