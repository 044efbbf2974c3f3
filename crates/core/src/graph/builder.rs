//! Builds the provenance graph from an ordered command stream.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fingerprint::{fingerprint_file, Fingerprint};
use crate::graph::{AliasMap, ArtifactNode, NodeId, ProvenanceGraph};
use crate::model::{is_source_file, TypedCommand};
use crate::util::resolve_path;

/// Constructs a [`ProvenanceGraph`] from typed commands.
///
/// Construction is order-sensitive: node identity resolution depends on
/// what has already been registered, so commands are consumed strictly in
/// trace order. Candidate sets iterate sorted, which keeps identity
/// resolution deterministic run-to-run.
pub struct GraphBuilder<'a> {
    aliases: AliasMap,
    system_paths: &'a BTreeSet<PathBuf>,
    normalize_crlf: bool,
    by_fingerprint: HashMap<Fingerprint, NodeId>,
    graph: ProvenanceGraph,
}

impl<'a> GraphBuilder<'a> {
    /// Build the graph for `commands`, resolving bare library names
    /// against `system_paths` plus each link command's own search paths.
    pub fn build(
        commands: &[TypedCommand],
        system_paths: &'a BTreeSet<PathBuf>,
        normalize_crlf: bool,
    ) -> ProvenanceGraph {
        let mut builder = GraphBuilder {
            aliases: AliasMap::from_commands(commands),
            system_paths,
            normalize_crlf,
            by_fingerprint: HashMap::new(),
            graph: ProvenanceGraph::default(),
        };

        for command in commands {
            builder.add_command(command);
        }

        let graph = builder.graph;
        debug!(
            nodes = graph.member_count(),
            edges = graph.edge_count(),
            "built provenance graph"
        );
        graph
    }

    fn add_command(&mut self, command: &TypedCommand) {
        let empty: &[String] = &[];
        let (program, working_dir, inputs, output, library_names, search_paths) = match command {
            TypedCommand::Archive { program, working_dir, inputs, output }
            | TypedCommand::Compile { program, working_dir, inputs, output }
            | TypedCommand::Assemble { program, working_dir, inputs, output } => {
                (program, working_dir, inputs, output.as_ref(), empty, empty)
            }
            TypedCommand::Link {
                program,
                working_dir,
                inputs,
                output,
                search_paths,
                library_names,
            } => (
                program,
                working_dir,
                inputs,
                output.as_ref(),
                library_names.as_slice(),
                search_paths.as_slice(),
            ),
            // relocations only inform the alias map, scanned up front
            TypedCommand::Relocate { .. } => return,
        };

        let mut input_ids: BTreeSet<NodeId> = BTreeSet::new();
        for input in inputs {
            input_ids.insert(self.file_node(input, working_dir));
        }
        for name in library_names {
            match self.library_node(name, search_paths, working_dir) {
                Some(id) => {
                    input_ids.insert(id);
                }
                None => {
                    debug!(
                        library = %name,
                        "library reference resolved to no existing file; dropped"
                    );
                }
            }
        }

        let Some(output) = output else {
            // inputs stay registered; they may still back other edges
            debug!(program = %program, "command declares no output; no edges added");
            return;
        };

        let output_id = self.file_node(output, working_dir);
        self.graph.mark_member(output_id);
        for input_id in input_ids {
            self.graph.mark_member(input_id);
            self.graph.add_edge(input_id, output_id);
        }
    }

    /// Obtain-or-create the node for a file referenced by path. Candidates
    /// are the resolved path plus every alternate a relocation recorded
    /// for it.
    fn file_node(&mut self, raw: &str, working_dir: &Path) -> NodeId {
        let resolved = resolve_path(working_dir, raw);

        let mut candidates: BTreeSet<PathBuf> = BTreeSet::new();
        if let Some(alternates) = self.aliases.alternates(&resolved) {
            candidates.extend(alternates.iter().cloned());
        }
        candidates.insert(resolved.clone());

        for candidate in &candidates {
            if let Some(id) = self.graph.lookup_path(candidate) {
                return id;
            }
        }

        match candidates.iter().find(|candidate| candidate.is_file()).cloned() {
            Some(on_disk) => self.register(on_disk),
            None => {
                // Produced and deleted before the analysis ran (assembler
                // output in a temp dir, typically). Keep a node anyway;
                // it just cannot be fingerprinted.
                self.graph.register(ArtifactNode { path: resolved, fingerprint: None })
            }
        }
    }

    /// Obtain-or-create the node for a `-l<name>` reference. Candidates
    /// are `lib<name>.a` / `lib<name>.so` across the system search dirs
    /// and the command's own `-L` dirs.
    ///
    /// Unlike plain file references, a library reference with no
    /// registered and no on-disk candidate yields no node at all: traced
    /// builds routinely name libraries that never materialize on the
    /// machine running the analysis.
    fn library_node(
        &mut self,
        name: &str,
        search_paths: &[String],
        working_dir: &Path,
    ) -> Option<NodeId> {
        let file_names = [format!("lib{name}.a"), format!("lib{name}.so")];

        let mut candidates: BTreeSet<PathBuf> = BTreeSet::new();
        for dir in self.system_paths {
            for file_name in &file_names {
                candidates.insert(resolve_path(dir, file_name));
            }
        }
        for dir in search_paths {
            let dir = resolve_path(working_dir, dir);
            for file_name in &file_names {
                candidates.insert(resolve_path(&dir, file_name));
            }
        }

        for candidate in &candidates {
            if let Some(id) = self.graph.lookup_path(candidate) {
                return Some(id);
            }
        }

        let on_disk = candidates.iter().find(|candidate| candidate.is_file()).cloned()?;
        Some(self.register(on_disk))
    }

    /// Register a node for a path that exists on disk, merging with any
    /// node that already carries the same fingerprint. The merge catches
    /// byte-identical artifacts reached via paths no traced relocation
    /// connects, such as a `make install` into an already-installed
    /// prefix.
    fn register(&mut self, path: PathBuf) -> NodeId {
        let normalize = self.normalize_crlf && is_source_file(&path.to_string_lossy());
        match fingerprint_file(&path, normalize) {
            Ok(fingerprint) => {
                if let Some(&id) = self.by_fingerprint.get(&fingerprint) {
                    return id;
                }
                let id = self.graph.register(ArtifactNode {
                    path,
                    fingerprint: Some(fingerprint.clone()),
                });
                self.by_fingerprint.insert(fingerprint, id);
                id
            }
            Err(err) => {
                // the file vanished between the existence check and hashing
                warn!(path = %path.display(), "failed to fingerprint file: {err}");
                self.graph.register(ArtifactNode { path, fingerprint: None })
            }
        }
    }
}
