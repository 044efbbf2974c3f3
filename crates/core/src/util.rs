//! Small path helpers shared across the pipeline.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` and lexically normalize the result:
/// `..` pops a component, `.` disappears.
///
/// No filesystem access and no symlink resolution: trace working
/// directories and install targets may no longer exist when the analysis
/// runs, so the resolution has to work on names alone.
pub fn resolve_path(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    normalize_lexically(&joined)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
