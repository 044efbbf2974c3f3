//! Command model for traced build invocations.
//!
//! A tracer records every process the build spawned as `{pwd, cmd, args}`.
//! Only five shapes of command carry provenance information: archiver,
//! compiler front-end, assembler, linker, and file relocations
//! (mv/cp/ln/install). Everything else is dropped at parse time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One recorded process invocation from the tracer log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Working directory the process was spawned in.
    #[serde(rename = "pwd")]
    pub working_dir: PathBuf,
    /// Program path as invoked (e.g. `/usr/bin/ld.gold`).
    #[serde(rename = "cmd")]
    pub program: String,
    /// Argument list, excluding the program itself.
    pub args: Vec<String>,
}

/// Destination of a relocation: either a single target file (rename or
/// copy-to-file mode) or a directory receiving many sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocateTarget {
    File(String),
    Directory(String),
}

/// A traced invocation narrowed to one of the command shapes that matter
/// for provenance. Each variant carries exactly the fields its parser
/// extracts; nothing is shared across variants.
///
/// Input and output paths are kept as the raw strings the tracer saw
/// (relative or absolute) and are resolved against `working_dir` only by
/// the graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedCommand {
    /// `ar`: object files folded into a static library.
    Archive {
        program: String,
        working_dir: PathBuf,
        inputs: Vec<String>,
        output: Option<String>,
    },
    /// `cc1` / `cc1plus`: source files compiled to assembly or an object.
    Compile {
        program: String,
        working_dir: PathBuf,
        inputs: Vec<String>,
        output: Option<String>,
    },
    /// `as`: assembly translated to an object file.
    Assemble {
        program: String,
        working_dir: PathBuf,
        inputs: Vec<String>,
        output: Option<String>,
    },
    /// `ld` and friends: objects and libraries linked into a binary.
    Link {
        program: String,
        working_dir: PathBuf,
        inputs: Vec<String>,
        output: Option<String>,
        /// Directories from `-L` flags, in order of appearance.
        search_paths: Vec<String>,
        /// Bare names from `-l` flags (without the `lib` prefix).
        library_names: Vec<String>,
    },
    /// `mv` / `cp` / `ln` / `install`: evidence that two paths denote the
    /// same logical artifact. Contributes no graph edges directly.
    Relocate {
        program: String,
        working_dir: PathBuf,
        sources: Vec<String>,
        destination: RelocateTarget,
    },
}

/// Extensions treated as C/C++ source, including headers and template
/// implementation files.
const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "h++", "ii", "ixx", "ipp", "txx",
    "tpp", "tpl",
];

/// True if the path has a recognized C/C++ source extension.
pub fn is_source_file(path: &str) -> bool {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// True if the path names an object file (`.o`, `.obj`, `.out`).
pub fn is_object_file(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".o") || lower.ends_with(".obj") || lower.ends_with(".out")
}

/// True if the path names a static or shared library.
///
/// Deliberately loose: `.so` or `.a` anywhere in the name, so versioned
/// shared objects like `libc.so.6` are caught too.
pub fn is_lib_file(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains(".so") || lower.contains(".a")
}
