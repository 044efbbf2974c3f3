//! Content fingerprinting for build artifacts.
//!
//! Fingerprints serve two purposes: change detection in the emitted
//! manifest, and merging artifacts that are byte-identical but reached via
//! paths no traced relocation connects (build-dir vs install-dir copies).

use std::fmt;
use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Opaque content hash over a file. Equality is the only meaningful
/// operation besides rendering the hex digest into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex-encoded digest.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 fingerprint of a file.
///
/// With `normalize_crlf` set, Windows-style line separators are converted
/// to Unix style before hashing, so the same source checked out with
/// different line endings fingerprints identically. Callers hash binary
/// artifacts byte-for-byte by passing `false`.
///
/// Fails only on I/O errors; callers check existence first.
pub fn fingerprint_file(path: &Path, normalize_crlf: bool) -> io::Result<Fingerprint> {
    let mut hasher = Sha256::new();

    if normalize_crlf {
        let contents = fs::read(path)?;
        hasher.update(normalize_line_endings(&contents));
    } else {
        let file = fs::File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
    }

    Ok(Fingerprint(format!("{:x}", hasher.finalize())))
}

/// Replace `\r\n` with `\n`, leaving lone carriage returns untouched.
fn normalize_line_endings(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            i += 1;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
