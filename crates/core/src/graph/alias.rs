//! Relocation equivalence: which paths denote the same logical artifact.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::model::{RelocateTarget, TypedCommand};
use crate::util::resolve_path;

/// Undirected, symmetric relation over absolute paths built from the
/// relocation commands in a trace. When command evidence shows path A
/// became path B (mv/cp/ln/install), each path is recorded in the other's
/// set.
///
/// The relation is intentionally not closed transitively up front; lookups
/// union a path's own adjacency set with the literal path, which is all
/// the graph builder needs for candidate resolution.
#[derive(Debug, Default)]
pub struct AliasMap {
    aliases: HashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl AliasMap {
    /// Scan all relocation commands in the stream and record each
    /// source/target pair.
    pub fn from_commands(commands: &[TypedCommand]) -> Self {
        let mut map = AliasMap::default();

        for command in commands {
            let TypedCommand::Relocate { working_dir, sources, destination, .. } = command
            else {
                continue;
            };

            match destination {
                RelocateTarget::File(target) => {
                    // single-target mode only ever has one source
                    if let Some(source) = sources.first() {
                        let source = resolve_path(working_dir, source);
                        let target = resolve_path(working_dir, target);
                        map.record(source, target);
                    }
                }
                RelocateTarget::Directory(target_dir) => {
                    for source in sources {
                        let source = resolve_path(working_dir, source);
                        let Some(file_name) = source.file_name() else { continue };
                        let target =
                            resolve_path(working_dir, Path::new(target_dir).join(file_name));
                        map.record(source, target);
                    }
                }
            }
        }

        map
    }

    fn record(&mut self, lhs: PathBuf, rhs: PathBuf) {
        self.aliases.entry(lhs.clone()).or_default().insert(rhs.clone());
        self.aliases.entry(rhs).or_default().insert(lhs);
    }

    /// All recorded alternates for `path`, if any.
    pub fn alternates(&self, path: &Path) -> Option<&BTreeSet<PathBuf>> {
        self.aliases.get(path)
    }

    /// Number of paths with at least one recorded alternate.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
