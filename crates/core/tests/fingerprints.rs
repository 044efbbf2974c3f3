use std::fs;

use trace_core::fingerprint::fingerprint_file;

#[test]
fn identical_content_fingerprints_identically() {
    let temp = tempfile::tempdir().expect("tempdir");
    let one = temp.path().join("one.bin");
    let two = temp.path().join("two.bin");
    fs::write(&one, b"same bytes").unwrap();
    fs::write(&two, b"same bytes").unwrap();

    let fp_one = fingerprint_file(&one, false).expect("fingerprint one");
    let fp_two = fingerprint_file(&two, false).expect("fingerprint two");
    assert_eq!(fp_one, fp_two);
}

#[test]
fn different_content_fingerprints_differently() {
    let temp = tempfile::tempdir().expect("tempdir");
    let one = temp.path().join("one.bin");
    let two = temp.path().join("two.bin");
    fs::write(&one, b"some bytes").unwrap();
    fs::write(&two, b"other bytes").unwrap();

    let fp_one = fingerprint_file(&one, false).expect("fingerprint one");
    let fp_two = fingerprint_file(&two, false).expect("fingerprint two");
    assert_ne!(fp_one, fp_two);
}

#[test]
fn crlf_normalization_equates_checkout_styles() {
    let temp = tempfile::tempdir().expect("tempdir");
    let windows = temp.path().join("windows.c");
    let unix = temp.path().join("unix.c");
    fs::write(&windows, "int main(void) {\r\n    return 0;\r\n}\r\n").unwrap();
    fs::write(&unix, "int main(void) {\n    return 0;\n}\n").unwrap();

    let normalized_windows = fingerprint_file(&windows, true).expect("fingerprint");
    let normalized_unix = fingerprint_file(&unix, true).expect("fingerprint");
    assert_eq!(normalized_windows, normalized_unix);

    // without normalization the two checkouts stay distinct
    let raw_windows = fingerprint_file(&windows, false).expect("fingerprint");
    let raw_unix = fingerprint_file(&unix, false).expect("fingerprint");
    assert_ne!(raw_windows, raw_unix);
}

#[test]
fn lone_carriage_returns_survive_normalization() {
    let temp = tempfile::tempdir().expect("tempdir");
    let with_cr = temp.path().join("cr.c");
    let without_cr = temp.path().join("nocr.c");
    fs::write(&with_cr, "a\rb\n").unwrap();
    fs::write(&without_cr, "ab\n").unwrap();

    let fp_cr = fingerprint_file(&with_cr, true).expect("fingerprint");
    let fp_nocr = fingerprint_file(&without_cr, true).expect("fingerprint");
    assert_ne!(fp_cr, fp_nocr);
}

#[test]
fn missing_files_are_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    assert!(fingerprint_file(&temp.path().join("ghost.c"), true).is_err());
}

#[test]
fn digest_renders_as_hex() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("file.bin");
    fs::write(&file, b"bytes").unwrap();

    let fingerprint = fingerprint_file(&file, false).expect("fingerprint");
    assert_eq!(fingerprint.as_hex().len(), 64);
    assert!(fingerprint.as_hex().chars().all(|c| c.is_ascii_hexdigit()));
}
