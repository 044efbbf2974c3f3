//! Discovery of the linker's default library search directories.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::util::resolve_path;

#[derive(Debug, Error)]
pub enum SearchDirError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("no `libraries:` line in search-dirs output")]
    MissingLibrariesLine,

    #[error("failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Ask the platform compiler driver which directories the linker searches
/// for libraries by default.
///
/// The compiler binary defaults to `gcc` on `PATH` and can be overridden
/// with the `GCC_BIN` environment variable.
pub fn discover_system_lib_paths() -> Result<BTreeSet<PathBuf>, SearchDirError> {
    let gcc_bin = std::env::var_os("GCC_BIN")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gcc"));
    let program = gcc_bin.display().to_string();

    let output = Command::new(&gcc_bin)
        .arg("--print-search-dirs")
        .output()
        .map_err(|source| SearchDirError::Spawn { program: program.clone(), source })?;

    if !output.status.success() {
        return Err(SearchDirError::Failed { program, status: output.status });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let base = std::env::current_dir().map_err(SearchDirError::CurrentDir)?;
    let paths = parse_search_dirs(&stdout, &base)?;

    debug!(count = paths.len(), "discovered system library search dirs");
    Ok(paths)
}

/// Extract the library directories from `--print-search-dirs` output: the
/// `libraries: =` line, colon-separated. Relative entries are resolved
/// against `base`.
pub fn parse_search_dirs(
    output: &str,
    base: &Path,
) -> Result<BTreeSet<PathBuf>, SearchDirError> {
    for line in output.lines() {
        let Some(rest) = line.strip_prefix("libraries:") else { continue };
        let trimmed = rest.trim_start();
        let list = trimmed.strip_prefix('=').unwrap_or(trimmed);

        let mut dirs = BTreeSet::new();
        for entry in list.split(':') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            dirs.insert(resolve_path(base, entry));
        }
        return Ok(dirs);
    }

    Err(SearchDirError::MissingLibrariesLine)
}
