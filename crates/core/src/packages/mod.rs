//! OS package resolution for artifacts the trace never shows being built.

pub mod dpkg;

pub use dpkg::DpkgResolver;

use std::path::Path;

use thiserror::Error;

/// Identity of the package owning a file, as reported by the platform's
/// package database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwningPackage {
    /// Binary package name (e.g. `libc6`).
    pub binary_name: String,
    /// Source package name; empty when the database tracks no separate
    /// source package.
    pub source_name: String,
    /// Package version string.
    pub version: String,
}

/// Error from a package-database lookup.
#[derive(Debug, Error)]
pub enum PackageLookupError {
    /// The database tool could not be spawned at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but its output could not be interpreted.
    #[error("{program} produced unexpected output: {detail}")]
    Malformed { program: String, detail: String },
}

/// Reverse lookup from file path to owning OS package.
///
/// `Ok(None)` means the path is not managed by the OS package system; an
/// error means the lookup itself failed. Callers treat both as "node stays
/// unidentified"; single-attempt semantics, never retried here.
pub trait PackageResolver {
    fn lookup_owning_package(
        &self,
        path: &Path,
    ) -> Result<Option<OwningPackage>, PackageLookupError>;
}
