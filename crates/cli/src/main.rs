use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};

use trace_core::analysis::{analyze_commands, AnalysisOptions};
use trace_core::packages::DpkgResolver;
use trace_core::parse::parse_entries;
use trace_core::syspaths::discover_system_lib_paths;
use trace_deps::{init_logging, read_trace_log, write_manifest};

/// Rebuilds the dependency graph of a traced native build.
///
/// This CLI is a thin wrapper around `trace-core` (exposed in code as
/// `trace_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "trace-deps",
    version,
    about = "Rebuilds the dependency graph of a traced C/C++ build",
    long_about = None
)]
struct Cli {
    /// Path to the tracer log file to parse.
    #[arg(long)]
    tracer_log_path: PathBuf,

    /// Location of the output manifest JSON, which contains all
    /// dependencies.
    #[arg(long)]
    manifest_output_path: PathBuf,

    /// Disable conversion of source-file line separators from
    /// Windows style to Unix style before calculating fingerprints.
    #[arg(long, default_value_t = false)]
    disable_crlf: bool,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let entries = read_trace_log(&cli.tracer_log_path)?;
    let commands = parse_entries(&entries);
    debug!(entries = entries.len(), relevant = commands.len(), "parsed tracer log");

    // The graph can still be built without the system dirs; bare -l
    // references just resolve less often.
    let system_paths = match discover_system_lib_paths() {
        Ok(paths) => paths,
        Err(err) => {
            warn!("could not discover system library search dirs: {err}");
            BTreeSet::new()
        }
    };

    let resolver = DpkgResolver::from_env();
    let options = AnalysisOptions { normalize_crlf: !cli.disable_crlf };
    let manifest = analyze_commands(&commands, &system_paths, &resolver, &options);

    write_manifest(&cli.manifest_output_path, &manifest)?;

    println!("Wrote dependency manifest:");
    println!("  Manifest: {}", cli.manifest_output_path.display());
    println!("  OS dependencies: {}", manifest.os_dependencies.len());
    println!("  Source-backed dependencies: {}", manifest.source_dependencies.len());

    Ok(())
}
