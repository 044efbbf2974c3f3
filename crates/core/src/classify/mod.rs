//! Boundary-node classification: which artifacts are built from traced
//! sources, and which are supplied by the operating system.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::graph::{NodeId, ProvenanceGraph};
use crate::model::{is_lib_file, is_object_file, is_source_file};
use crate::packages::PackageResolver;

/// Resolved OS package identity. The manifest deduplicates entries on the
/// `(source_name, version)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackageInfo {
    pub source_name: String,
    pub version: String,
}

/// Output of classification, keyed by boundary node. Created once,
/// immutable afterwards.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClassifiedDependencies {
    /// Boundary nodes with at least one discovered source file.
    pub source_backed: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Boundary nodes the OS package database claims.
    pub os_packages: BTreeMap<NodeId, PackageInfo>,
    /// Boundary nodes with no discovered sources and no owning package.
    /// Surfaced for logging, omitted from the manifest.
    pub unidentified: BTreeSet<NodeId>,
}

/// Select the nodes dependency attribution applies to: every library
/// file, plus every object file the trace shows being consumed but never
/// built; those likely come from the operating system.
pub fn boundary_candidates(graph: &ProvenanceGraph) -> BTreeSet<NodeId> {
    let mut candidates = BTreeSet::new();

    for id in graph.members() {
        let path = graph.node(id).path.to_string_lossy();
        if is_lib_file(&path) {
            candidates.insert(id);
        } else if is_object_file(&path) && graph.predecessors(id).is_empty() {
            candidates.insert(id);
        }
    }

    candidates
}

/// Classify every boundary candidate as source-backed, OS-supplied, or
/// unidentified.
///
/// A failed package lookup for one node never aborts classification of the
/// others; single-attempt semantics, no retries at this layer.
pub fn classify(
    graph: &ProvenanceGraph,
    resolver: &dyn PackageResolver,
) -> ClassifiedDependencies {
    let candidates = boundary_candidates(graph);
    let mut classified = ClassifiedDependencies::default();
    let mut needs_lookup = BTreeSet::new();

    for &root in &candidates {
        let sources = discover_sources(graph, root, &candidates);
        if sources.is_empty() {
            needs_lookup.insert(root);
        } else {
            debug!(
                root = %graph.node(root).path.display(),
                sources = sources.len(),
                "boundary node backed by traced sources"
            );
            classified.source_backed.insert(root, sources);
        }
    }

    for root in needs_lookup {
        let path = &graph.node(root).path;
        match resolver.lookup_owning_package(path) {
            Ok(Some(package)) => {
                // packages built straight from their binary name report no
                // separate source package
                let source_name = if package.source_name.is_empty() {
                    package.binary_name
                } else {
                    package.source_name
                };
                debug!(
                    node = %path.display(),
                    package = %source_name,
                    version = %package.version,
                    "owned by OS package"
                );
                classified
                    .os_packages
                    .insert(root, PackageInfo { source_name, version: package.version });
            }
            Ok(None) => {
                debug!(node = %path.display(), "no owning package; left unidentified");
                classified.unidentified.insert(root);
            }
            Err(err) => {
                warn!(node = %path.display(), "package lookup failed: {err}");
                classified.unidentified.insert(root);
            }
        }
    }

    classified
}

/// Walk backward from `root` along producer edges, collecting source
/// files.
///
/// Source files terminate expansion, and so do other boundary candidates:
/// a library linked against another library must not absorb the other's
/// source list. An explicit worklist with a visited set bounds stack depth
/// and terminates on cycles, self-loops, and diamonds.
pub fn discover_sources(
    graph: &ProvenanceGraph,
    root: NodeId,
    candidates: &BTreeSet<NodeId>,
) -> BTreeSet<NodeId> {
    let mut sources = BTreeSet::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut worklist = vec![root];

    while let Some(current) = worklist.pop() {
        if !visited.insert(current) {
            continue;
        }

        let path = graph.node(current).path.to_string_lossy();
        if is_source_file(&path) {
            sources.insert(current);
            continue;
        }

        for &pred in graph.predecessors(current) {
            if pred != root && candidates.contains(&pred) {
                continue;
            }
            worklist.push(pred);
        }
    }

    sources
}
