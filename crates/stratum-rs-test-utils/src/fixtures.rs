//! YAML fixture files written into temporary directories.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Top-level keys in mixed case, including one that only matches a field
/// once case-folded.
pub const CONFIG_YAML: &str = "\
FOO: from_file
CASE_SENSITIVE: is_not_case_sensitive
";

/// Sections disambiguated by a `PRE_` prefix.
pub const CONFIG_PREFIX_YAML: &str = "\
PRE_PARENT_CONFIG:
  CHILD_CONFIG_A: 1
  CHILD_CONFIG_B: 2.5
OTHER_SECTION: untouched
";

/// Boolean and numeric keys next to a string key.
pub const CONFIG_NON_STR_YAML: &str = "\
true: boolean key
1: numeric key
Name: string key
";

/// A sequence at the document root.
pub const CONFIG_NON_MAPPING_YAML: &str = "\
- first
- second
";

/// Temporary folder holding config fixtures, removed on drop.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name`, creating parent directories if needed.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        write_yaml(&self.dir.path().join(name), contents)
    }

    /// Write the standard fixtures under their conventional names.
    pub fn with_standard_fixtures() -> Self {
        let fixtures = Self::new();
        fixtures.write("config.yaml", CONFIG_YAML);
        fixtures.write("config_prefix.yaml", CONFIG_PREFIX_YAML);
        fixtures.write("config_non_str.yaml", CONFIG_NON_STR_YAML);
        fixtures.write("config_non_mapping.yaml", CONFIG_NON_MAPPING_YAML);
        fixtures
    }
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Write YAML contents to a path, creating parent directories if needed.
pub fn write_yaml(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
    path.to_path_buf()
}
