//! Provenance graph: build artifacts as nodes, "produced from" as edges.

pub mod alias;
pub mod builder;

pub use alias::AliasMap;
pub use builder::GraphBuilder;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::fingerprint::Fingerprint;

/// Stable handle into the graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A file participating in the build.
///
/// Identity is the canonical absolute path chosen at registration. The
/// fingerprint is absent when the file could not be found on disk, e.g. a
/// transient assembler output the build deleted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNode {
    pub path: PathBuf,
    pub fingerprint: Option<Fingerprint>,
}

/// Directed graph over an arena of artifact nodes. An edge `u -> v` means
/// "v was produced from u". Inputs may fan in to one output and outputs
/// may fan out to many consumers; self-loops are tolerated.
///
/// The arena doubles as the node registry: a node can be registered (so it
/// participates in identity resolution for later commands) without being a
/// member of the graph yet. Membership is granted when the node appears in
/// a command whose output resolved, and only members are visible to
/// classification.
#[derive(Debug, Default)]
pub struct ProvenanceGraph {
    nodes: Vec<ArtifactNode>,
    preds: Vec<BTreeSet<NodeId>>,
    succs: Vec<BTreeSet<NodeId>>,
    members: BTreeSet<NodeId>,
    by_path: HashMap<PathBuf, NodeId>,
}

impl ProvenanceGraph {
    /// The artifact behind a handle.
    pub fn node(&self, id: NodeId) -> &ArtifactNode {
        &self.nodes[id.index()]
    }

    /// Look up a node by the canonical path it was registered under.
    pub fn lookup_path(&self, path: &Path) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Graph members (not merely registered nodes), in registration order.
    pub fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }

    pub fn is_member(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Nodes this node was produced from.
    pub fn predecessors(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.preds[id.index()]
    }

    /// Nodes produced from this node.
    pub fn successors(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.succs[id.index()]
    }

    /// Total registered nodes, members or not.
    pub fn registered_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn edge_count(&self) -> usize {
        self.succs.iter().map(BTreeSet::len).sum()
    }

    pub(crate) fn register(&mut self, node: ArtifactNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.by_path.insert(node.path.clone(), id);
        self.nodes.push(node);
        self.preds.push(BTreeSet::new());
        self.succs.push(BTreeSet::new());
        id
    }

    pub(crate) fn mark_member(&mut self, id: NodeId) {
        self.members.insert(id);
    }

    /// Idempotent; duplicate edges collapse.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.succs[from.index()].insert(to);
        self.preds[to.index()].insert(from);
    }
}
