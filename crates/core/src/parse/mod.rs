//! Parser turning raw trace entries into typed command records.
//!
//! Dispatch is by suffix match on the traced program path, in priority
//! order, because tracers record full tool paths (`/usr/libexec/cc1plus`,
//! `/usr/bin/x86_64-linux-gnu-ld.gold`, ...). Programs matching no known
//! suffix carry no provenance and parse to `None`.

use thiserror::Error;
use tracing::warn;

use crate::model::{
    is_lib_file, is_object_file, is_source_file, RelocateTarget, TraceEntry, TypedCommand,
};

/// Per-entry parse failure. Skippable: the entry is dropped and the run
/// continues.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A relocation needs at least a source and a target.
    #[error("unable to parse args for {program}: expected at least two positional arguments, got {found}")]
    TooFewPositionals { program: String, found: usize },
}

/// Narrow one trace entry to a typed command.
///
/// Returns `Ok(None)` for programs irrelevant to provenance, and an error
/// only for entries that match a known program but whose arguments cannot
/// be made sense of.
pub fn parse_entry(entry: &TraceEntry) -> Result<Option<TypedCommand>, ParseError> {
    let program = entry.program.as_str();

    let command = if program.ends_with("ld")
        || program.ends_with("ld.bfd")
        || program.ends_with("ld.gold")
    {
        Some(parse_link(entry))
    } else if program.ends_with("ar") {
        Some(parse_archive(entry))
    } else if program.ends_with("cc1") || program.ends_with("cc1plus") {
        Some(parse_compile(entry))
    } else if program.ends_with("as") {
        Some(parse_assemble(entry))
    } else if program.ends_with("mv")
        || program.ends_with("cp")
        || program.ends_with("ln")
        || program.ends_with("install")
    {
        Some(parse_relocate(entry)?)
    } else {
        None
    };

    Ok(command)
}

/// Parse a whole trace, logging and skipping entries that are irrelevant
/// or unparseable. Order is preserved; graph construction depends on it.
pub fn parse_entries(entries: &[TraceEntry]) -> Vec<TypedCommand> {
    let mut commands = Vec::new();
    for entry in entries {
        match parse_entry(entry) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(err) => warn!("skipping trace entry: {err}"),
        }
    }
    commands
}

fn parse_link(entry: &TraceEntry) -> TypedCommand {
    // -soname is consumed only so its value is not misread as an input.
    let scanned = scan_args(&entry.args, &["-soname", "-o", "-L", "-l"]);
    let inputs = scanned
        .rest
        .iter()
        .filter(|token| {
            // .lo shows up where object files were renamed by libtool
            is_object_file(token)
                || is_lib_file(token)
                || token.to_ascii_lowercase().ends_with(".lo")
        })
        .cloned()
        .collect();

    TypedCommand::Link {
        program: entry.program.clone(),
        working_dir: entry.working_dir.clone(),
        inputs,
        output: scanned.last("-o").map(str::to_string),
        search_paths: scanned.all("-L"),
        library_names: scanned.all("-l"),
    }
}

fn parse_archive(entry: &TraceEntry) -> TypedCommand {
    // ar has no value-taking flags we care about; mode strings like `rcs`
    // fall through the file-kind filters.
    let inputs = entry.args.iter().filter(|token| is_object_file(token)).cloned().collect();
    let output = entry.args.iter().find(|token| is_lib_file(token)).cloned();

    TypedCommand::Archive {
        program: entry.program.clone(),
        working_dir: entry.working_dir.clone(),
        inputs,
        output,
    }
}

fn parse_compile(entry: &TraceEntry) -> TypedCommand {
    // -dumpbase carries the source file name without any directory, which
    // is useless for path resolution; consumed so it stays out of inputs.
    let scanned = scan_args(&entry.args, &["-dumpbase", "-o"]);
    let inputs = scanned.rest.iter().filter(|token| is_source_file(token)).cloned().collect();

    TypedCommand::Compile {
        program: entry.program.clone(),
        working_dir: entry.working_dir.clone(),
        inputs,
        output: scanned.last("-o").map(str::to_string),
    }
}

fn parse_assemble(entry: &TraceEntry) -> TypedCommand {
    let scanned = scan_args(&entry.args, &["-o"]);
    let inputs = scanned
        .rest
        .iter()
        .filter(|token| token.to_ascii_lowercase().ends_with(".s"))
        .cloned()
        .collect();

    TypedCommand::Assemble {
        program: entry.program.clone(),
        working_dir: entry.working_dir.clone(),
        inputs,
        output: scanned.last("-o").map(str::to_string),
    }
}

fn parse_relocate(entry: &TraceEntry) -> Result<TypedCommand, ParseError> {
    let positionals: Vec<&String> =
        entry.args.iter().filter(|arg| !arg.starts_with('-')).collect();

    if positionals.len() < 2 {
        return Err(ParseError::TooFewPositionals {
            program: entry.program.clone(),
            found: positionals.len(),
        });
    }

    // Two modes: rename/copy a single file to positional[1], or move all
    // of positional[0..n-1] into the directory positional[n-1].
    let (sources, destination) = if positionals.len() == 2 {
        (vec![positionals[0].clone()], RelocateTarget::File(positionals[1].clone()))
    } else {
        let target_dir = positionals[positionals.len() - 1].clone();
        let sources =
            positionals[..positionals.len() - 1].iter().map(|s| (*s).clone()).collect();
        (sources, RelocateTarget::Directory(target_dir))
    };

    Ok(TypedCommand::Relocate {
        program: entry.program.clone(),
        working_dir: entry.working_dir.clone(),
        sources,
        destination,
    })
}

/// Result of scanning an argument list for value-taking flags.
struct ScannedArgs {
    values: Vec<(&'static str, String)>,
    rest: Vec<String>,
}

impl ScannedArgs {
    /// Last value given for `flag`, mirroring how the real tools let later
    /// occurrences win.
    fn last(&self, flag: &str) -> Option<&str> {
        self.values.iter().rev().find(|(f, _)| *f == flag).map(|(_, value)| value.as_str())
    }

    /// Every value given for `flag`, in order.
    fn all(&self, flag: &str) -> Vec<String> {
        self.values
            .iter()
            .filter(|(f, _)| *f == flag)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// Pull the given value-taking flags out of `args`.
///
/// Both separated (`-o out`) and attached (`-oout`, `-o=out`) forms are
/// accepted. Everything not consumed by a flag (including options we do
/// not recognize) lands in `rest`, which callers filter by file kind; the
/// toolchain's own argument handling is just as tolerant of arguments it
/// does not know.
fn scan_args(args: &[String], flags: &[&'static str]) -> ScannedArgs {
    let mut values = Vec::new();
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        let mut consumed = false;

        for &flag in flags {
            if arg == flag {
                if i + 1 < args.len() {
                    values.push((flag, args[i + 1].clone()));
                    i += 2;
                } else {
                    // dangling flag at the end of the line; nothing to record
                    i += 1;
                }
                consumed = true;
                break;
            }
            if let Some(attached) = arg.strip_prefix(flag) {
                if !attached.is_empty() {
                    let value = attached.strip_prefix('=').unwrap_or(attached);
                    values.push((flag, value.to_string()));
                    i += 1;
                    consumed = true;
                    break;
                }
            }
        }

        if !consumed {
            rest.push(arg.clone());
            i += 1;
        }
    }

    ScannedArgs { values, rest }
}
