//! End-to-end analysis pipeline: typed commands in, manifest out.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::classify;
use crate::graph::GraphBuilder;
use crate::manifest::Manifest;
use crate::model::TypedCommand;
use crate::packages::PackageResolver;

/// Pipeline-wide options.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Convert Windows line separators before hashing source files, so the
    /// same source fingerprints identically regardless of checkout style.
    pub normalize_crlf: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { normalize_crlf: true }
    }
}

/// Run the full pipeline over an ordered command stream: build the
/// provenance graph, classify its boundary nodes, assemble the manifest.
pub fn analyze_commands(
    commands: &[TypedCommand],
    system_paths: &BTreeSet<PathBuf>,
    resolver: &dyn PackageResolver,
    options: &AnalysisOptions,
) -> Manifest {
    let graph = GraphBuilder::build(commands, system_paths, options.normalize_crlf);
    let classified = classify::classify(&graph, resolver);
    debug!(
        source_backed = classified.source_backed.len(),
        os_packages = classified.os_packages.len(),
        unidentified = classified.unidentified.len(),
        "classified boundary nodes"
    );
    Manifest::assemble(&graph, &classified)
}
