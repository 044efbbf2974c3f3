//! Debian package database resolver shelling out to dpkg.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::packages::{OwningPackage, PackageLookupError, PackageResolver};

/// Resolver backed by `dpkg -S` (path to owning binary package) and
/// `dpkg-query` (binary package to package/source/version triple).
pub struct DpkgResolver {
    dpkg_bin: PathBuf,
    dpkg_query_bin: PathBuf,
}

impl DpkgResolver {
    /// Tool paths default to `dpkg` / `dpkg-query` on `PATH`; the
    /// `DPKG_BIN` and `DPKG_QUERY_BIN` environment variables override
    /// them.
    pub fn from_env() -> Self {
        Self {
            dpkg_bin: std::env::var_os("DPKG_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dpkg")),
            dpkg_query_bin: std::env::var_os("DPKG_QUERY_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dpkg-query")),
        }
    }
}

impl Default for DpkgResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PackageResolver for DpkgResolver {
    fn lookup_owning_package(
        &self,
        path: &Path,
    ) -> Result<Option<OwningPackage>, PackageLookupError> {
        let output = Command::new(&self.dpkg_bin).arg("-S").arg(path).output().map_err(
            |source| PackageLookupError::Spawn {
                program: self.dpkg_bin.display().to_string(),
                source,
            },
        )?;

        if !output.status.success() {
            // dpkg -S exits non-zero when no package owns the path
            debug!(path = %path.display(), "dpkg reports no owning package");
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(package_name) = parse_dpkg_search_output(&stdout) else {
            return Ok(None);
        };
        debug!(path = %path.display(), package = %package_name, "dpkg found owning package");

        let output = Command::new(&self.dpkg_query_bin)
            .arg("--showformat=${Package}\n${Source}\n${Version}")
            .arg("--show")
            .arg(&package_name)
            .output()
            .map_err(|source| PackageLookupError::Spawn {
                program: self.dpkg_query_bin.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(PackageLookupError::Malformed {
                program: self.dpkg_query_bin.display().to_string(),
                detail: format!("exited with {} for package {package_name}", output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_dpkg_query_output(&stdout).map(Some).map_err(|detail| {
            PackageLookupError::Malformed {
                program: self.dpkg_query_bin.display().to_string(),
                detail,
            }
        })
    }
}

/// Extract the binary package name from `dpkg -S` output, e.g.
/// `libc6:amd64: /lib/x86_64-linux-gnu/libc.so.6` yields `libc6`.
///
/// Returns `None` for output that names no package, such as the
/// `dpkg-query: no path found matching pattern ...` diagnostic some dpkg
/// versions print instead of failing.
pub fn parse_dpkg_search_output(output: &str) -> Option<String> {
    let package = output.split(':').next()?.trim();
    if package.is_empty() || package == "dpkg" || package == "dpkg-query" {
        return None;
    }
    Some(package.to_string())
}

/// Parse the three-line `${Package}\n${Source}\n${Version}` payload from
/// `dpkg-query`. The source line may legitimately be empty.
pub fn parse_dpkg_query_output(output: &str) -> Result<OwningPackage, String> {
    let mut lines = output.lines();
    let (Some(binary), Some(source), Some(version)) = (lines.next(), lines.next(), lines.next())
    else {
        return Err(format!("expected three lines of package metadata, got {output:?}"));
    };

    Ok(OwningPackage {
        binary_name: binary.trim().to_string(),
        source_name: source.trim().to_string(),
        version: version.trim().to_string(),
    })
}
