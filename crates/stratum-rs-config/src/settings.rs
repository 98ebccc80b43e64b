//! Source settings and their precedence resolution.
//!
//! A model declares its defaults through [`SourceSettings`]; each load may
//! override any of them through [`SourceOverrides`]. Fields left unset by the
//! model fall back to the library defaults of [`SourceSettings::default`].

use crate::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Text encoding used to decode the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    #[default]
    Utf8,
    /// UTF-8 with an optional leading byte order mark.
    Utf8Sig,
    Ascii,
    /// ISO-8859-1.
    Latin1,
}

impl FileEncoding {
    /// Canonical label, as accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            FileEncoding::Utf8 => "utf-8",
            FileEncoding::Utf8Sig => "utf-8-sig",
            FileEncoding::Ascii => "ascii",
            FileEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode raw file bytes, returning `None` when they are invalid.
    pub fn decode(self, bytes: Vec<u8>) -> Option<String> {
        match self {
            FileEncoding::Utf8 => String::from_utf8(bytes).ok(),
            FileEncoding::Utf8Sig => {
                let text = String::from_utf8(bytes).ok()?;
                Some(match text.strip_prefix('\u{feff}') {
                    Some(stripped) => stripped.to_string(),
                    None => text,
                })
            }
            FileEncoding::Ascii => {
                if bytes.is_ascii() {
                    String::from_utf8(bytes).ok()
                } else {
                    None
                }
            }
            FileEncoding::Latin1 => Some(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl fmt::Display for FileEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileEncoding {
    type Err = ConfigError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Ok(FileEncoding::Utf8),
            "utf8sig" => Ok(FileEncoding::Utf8Sig),
            "ascii" | "usascii" => Ok(FileEncoding::Ascii),
            "latin1" | "iso88591" | "l1" => Ok(FileEncoding::Latin1),
            _ => Err(ConfigError::UnsupportedEncoding(label.to_string())),
        }
    }
}

/// Settings that drive the built-in sources for a single load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    /// Match top-level file keys exactly instead of lower-casing them.
    pub case_sensitive: bool,
    /// Config file name inside `folder`.
    pub file_name: Option<String>,
    /// Folder holding the config file; a leading `~` expands to the home dir.
    pub folder: Option<PathBuf>,
    pub encoding: FileEncoding,
    /// Literal prefix stripped from top-level file keys.
    pub prefix: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            file_name: None,
            folder: None,
            encoding: FileEncoding::Utf8,
            prefix: None,
        }
    }
}

impl SourceSettings {
    /// Settings pointing at `folder/file_name`, everything else default.
    pub fn from_file(folder: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            folder: Some(folder.into()),
            file_name: Some(file_name.into()),
            ..Self::default()
        }
    }

    /// Apply per-load overrides on top of these declared settings.
    pub fn resolve(self, overrides: &SourceOverrides) -> SourceSettings {
        SourceSettings {
            case_sensitive: overrides.case_sensitive.unwrap_or(self.case_sensitive),
            file_name: overrides.file_name.clone().or(self.file_name),
            folder: overrides.folder.clone().or(self.folder),
            encoding: overrides.encoding.unwrap_or(self.encoding),
            prefix: overrides.prefix.clone().or(self.prefix),
        }
    }
}

/// Per-load overrides; `None` keeps the declared setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOverrides {
    pub case_sensitive: Option<bool>,
    pub file_name: Option<String>,
    pub folder: Option<PathBuf>,
    pub encoding: Option<FileEncoding>,
    pub prefix: Option<String>,
}

impl SourceOverrides {
    pub fn is_empty(&self) -> bool {
        *self == SourceOverrides::default()
    }
}
