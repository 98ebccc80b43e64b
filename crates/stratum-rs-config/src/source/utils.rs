//! Path helpers for file-backed sources.

use directories::UserDirs;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` component to the user's home directory.
///
/// `~user` forms are returned untouched, as is the path when no home
/// directory can be determined.
pub(super) fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == OsStr::new("~") => match UserDirs::new() {
            Some(dirs) => dirs.home_dir().join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}
