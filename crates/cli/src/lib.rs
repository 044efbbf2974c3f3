//! Shared helpers for the trace-deps CLI binary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use trace_core::manifest::Manifest;
use trace_core::model::TraceEntry;

/// Read and deserialize a tracer log: a JSON array of `{pwd, cmd, args}`
/// records, one per process the build spawned.
///
/// A log that is not valid JSON is fatal; no graph can be built from it
/// at all.
pub fn read_trace_log(path: &Path) -> Result<Vec<TraceEntry>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tracer log at {}", path.display()))?;
    let entries: Vec<TraceEntry> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tracer log JSON at {}", path.display()))?;
    Ok(entries)
}

/// Serialize the manifest to pretty JSON on disk.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)
        .context("Failed to serialize manifest to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write manifest at {}", path.display()))?;
    Ok(())
}

/// Initialize stderr logging. `verbose` lowers the default filter to
/// debug; `RUST_LOG` overrides either default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}
