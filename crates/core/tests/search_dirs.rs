use std::path::{Path, PathBuf};

use trace_core::syspaths::parse_search_dirs;

const GCC_OUTPUT: &str = "install: /usr/lib/gcc/x86_64-linux-gnu/9/\n\
programs: =/usr/lib/gcc/x86_64-linux-gnu/9/:/usr/bin\n\
libraries: =/usr/lib/gcc/x86_64-linux-gnu/9/:/usr/lib/x86_64-linux-gnu/:/usr/lib/:/lib/\n";

#[test]
fn libraries_line_is_split_on_colons() {
    let dirs = parse_search_dirs(GCC_OUTPUT, Path::new("/cwd")).expect("parse");

    assert!(dirs.contains(&PathBuf::from("/usr/lib/gcc/x86_64-linux-gnu/9")));
    assert!(dirs.contains(&PathBuf::from("/usr/lib/x86_64-linux-gnu")));
    assert!(dirs.contains(&PathBuf::from("/usr/lib")));
    assert!(dirs.contains(&PathBuf::from("/lib")));
    assert_eq!(dirs.len(), 4);
}

#[test]
fn relative_entries_resolve_against_the_base_dir() {
    let output = "libraries: =../lib:sub/dir\n";
    let dirs = parse_search_dirs(output, Path::new("/opt/toolchain/bin")).expect("parse");

    assert!(dirs.contains(&PathBuf::from("/opt/toolchain/lib")));
    assert!(dirs.contains(&PathBuf::from("/opt/toolchain/bin/sub/dir")));
}

#[test]
fn duplicate_entries_collapse() {
    let output = "libraries: =/usr/lib:/usr/lib/:/usr/lib/../lib\n";
    let dirs = parse_search_dirs(output, Path::new("/cwd")).expect("parse");
    assert_eq!(dirs.len(), 1);
}

#[test]
fn output_without_a_libraries_line_is_an_error() {
    let output = "install: /usr/lib/gcc/\nprograms: =/usr/bin\n";
    assert!(parse_search_dirs(output, Path::new("/cwd")).is_err());
}
