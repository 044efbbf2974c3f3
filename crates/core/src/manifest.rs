//! Final dependency manifest assembly.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::ClassifiedDependencies;
use crate::graph::ProvenanceGraph;

/// One deduplicated OS package entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsDependency {
    pub package_name: String,
    pub package_version: String,
}

/// One source file backing a boundary artifact. `fingerprint` is null when
/// the file could not be hashed (deleted before the analysis ran).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileEntry {
    pub file_path: String,
    pub fingerprint: Option<String>,
}

/// The dependency manifest: OS-supplied packages, plus the source files
/// each boundary artifact was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub os_dependencies: Vec<OsDependency>,
    pub source_dependencies: BTreeMap<String, Vec<SourceFileEntry>>,
}

impl Manifest {
    /// Fold classification results and graph fingerprints into the final
    /// manifest.
    ///
    /// Package entries deduplicate on `(source_name, version)`. Boundary
    /// nodes that stayed unidentified are logged and omitted from both
    /// lists.
    pub fn assemble(graph: &ProvenanceGraph, classified: &ClassifiedDependencies) -> Self {
        let mut seen = BTreeSet::new();
        let mut os_dependencies = Vec::new();
        for package in classified.os_packages.values() {
            if !seen.insert((package.source_name.clone(), package.version.clone())) {
                continue;
            }
            os_dependencies.push(OsDependency {
                package_name: package.source_name.clone(),
                package_version: package.version.clone(),
            });
        }

        let mut source_dependencies = BTreeMap::new();
        for (root, sources) in &classified.source_backed {
            let mut entries: Vec<SourceFileEntry> = sources
                .iter()
                .map(|&id| {
                    let node = graph.node(id);
                    SourceFileEntry {
                        file_path: node.path.display().to_string(),
                        fingerprint: node
                            .fingerprint
                            .as_ref()
                            .map(|fp| fp.as_hex().to_string()),
                    }
                })
                .collect();
            entries.sort_by(|a, b| a.file_path.cmp(&b.file_path));

            source_dependencies
                .insert(graph.node(*root).path.display().to_string(), entries);
        }

        for &id in &classified.unidentified {
            debug!(
                node = %graph.node(id).path.display(),
                "dependency left unidentified; omitted from manifest"
            );
        }

        Manifest { os_dependencies, source_dependencies }
    }
}
