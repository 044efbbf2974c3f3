use trace_core::model::{RelocateTarget, TraceEntry, TypedCommand};
use trace_core::parse::{parse_entries, parse_entry};

fn entry(program: &str, args: &[&str]) -> TraceEntry {
    TraceEntry {
        working_dir: "/build".into(),
        program: program.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn ld_extracts_output_search_paths_libraries_and_inputs() {
    let parsed = parse_entry(&entry(
        "/usr/bin/ld",
        &[
            "-o",
            "app.out",
            "-L",
            "/opt/lib",
            "-L/usr/local/lib",
            "-lm",
            "-lssl",
            "-soname",
            "libapp.so.1",
            "crt0.o",
            "main.o",
            "helper.lo",
            "notes.txt",
        ],
    ))
    .expect("parse");

    match parsed {
        Some(TypedCommand::Link { output, search_paths, library_names, inputs, .. }) => {
            assert_eq!(output.as_deref(), Some("app.out"));
            assert_eq!(search_paths, vec!["/opt/lib", "/usr/local/lib"]);
            assert_eq!(library_names, vec!["m", "ssl"]);
            // -soname's value must not leak into inputs; notes.txt is not
            // a linkable file kind.
            assert_eq!(inputs, vec!["crt0.o", "main.o", "helper.lo"]);
        }
        other => panic!("expected Link, got {other:?}"),
    }
}

#[test]
fn ld_gold_and_ld_bfd_dispatch_as_link() {
    for program in ["/usr/bin/x86_64-linux-gnu-ld.gold", "/usr/bin/ld.bfd"] {
        let parsed = parse_entry(&entry(program, &["-o", "a.out"])).expect("parse");
        assert!(matches!(parsed, Some(TypedCommand::Link { .. })), "program {program}");
    }
}

#[test]
fn ld_accepts_attached_flag_values() {
    let parsed = parse_entry(&entry("/usr/bin/ld", &["-oapp.out", "-lcrypto"])).expect("parse");
    match parsed {
        Some(TypedCommand::Link { output, library_names, .. }) => {
            assert_eq!(output.as_deref(), Some("app.out"));
            assert_eq!(library_names, vec!["crypto"]);
        }
        other => panic!("expected Link, got {other:?}"),
    }
}

#[test]
fn ar_takes_object_inputs_and_first_library_as_output() {
    let parsed =
        parse_entry(&entry("/usr/bin/ar", &["rcs", "libdemo.a", "a.o", "b.o"])).expect("parse");
    match parsed {
        Some(TypedCommand::Archive { inputs, output, .. }) => {
            assert_eq!(inputs, vec!["a.o", "b.o"]);
            assert_eq!(output.as_deref(), Some("libdemo.a"));
        }
        other => panic!("expected Archive, got {other:?}"),
    }
}

#[test]
fn ar_without_library_token_has_no_output() {
    let parsed = parse_entry(&entry("/usr/bin/ar", &["t", "a.o"])).expect("parse");
    match parsed {
        Some(TypedCommand::Archive { inputs, output, .. }) => {
            assert_eq!(inputs, vec!["a.o"]);
            assert_eq!(output, None);
        }
        other => panic!("expected Archive, got {other:?}"),
    }
}

#[test]
fn cc1plus_consumes_dumpbase_and_keeps_source_inputs() {
    let parsed = parse_entry(&entry(
        "/usr/libexec/gcc/cc1plus",
        &["-quiet", "-dumpbase", "main.cpp", "main.cpp", "readme.md", "-o", "main.s"],
    ))
    .expect("parse");

    match parsed {
        Some(TypedCommand::Compile { inputs, output, .. }) => {
            // the dumpbase value is consumed; only the positional source
            // survives the filter
            assert_eq!(inputs, vec!["main.cpp"]);
            assert_eq!(output.as_deref(), Some("main.s"));
        }
        other => panic!("expected Compile, got {other:?}"),
    }
}

#[test]
fn as_keeps_only_assembly_inputs() {
    let parsed = parse_entry(&entry(
        "/usr/bin/as",
        &["--64", "-o", "main.o", "main.s", "main.cpp"],
    ))
    .expect("parse");

    match parsed {
        Some(TypedCommand::Assemble { inputs, output, .. }) => {
            assert_eq!(inputs, vec!["main.s"]);
            assert_eq!(output.as_deref(), Some("main.o"));
        }
        other => panic!("expected Assemble, got {other:?}"),
    }
}

#[test]
fn cp_with_two_positionals_is_single_target_mode() {
    let parsed =
        parse_entry(&entry("/bin/cp", &["-f", "build/libdemo.a", "install/libdemo.a"]))
            .expect("parse");

    match parsed {
        Some(TypedCommand::Relocate { sources, destination, .. }) => {
            assert_eq!(sources, vec!["build/libdemo.a"]);
            assert_eq!(destination, RelocateTarget::File("install/libdemo.a".to_string()));
        }
        other => panic!("expected Relocate, got {other:?}"),
    }
}

#[test]
fn install_with_many_positionals_is_directory_target_mode() {
    let parsed = parse_entry(&entry(
        "/usr/bin/install",
        &["-m", "a.o", "b.o", "dest"],
    ))
    .expect("parse");

    match parsed {
        Some(TypedCommand::Relocate { sources, destination, .. }) => {
            assert_eq!(sources, vec!["a.o", "b.o"]);
            assert_eq!(destination, RelocateTarget::Directory("dest".to_string()));
        }
        other => panic!("expected Relocate, got {other:?}"),
    }
}

#[test]
fn relocate_with_too_few_positionals_fails() {
    let result = parse_entry(&entry("/bin/mv", &["-f", "only-one"]));
    assert!(result.is_err());
}

#[test]
fn unrelated_programs_parse_to_none() {
    for program in ["/usr/bin/make", "/usr/bin/cmake", "/usr/bin/sed"] {
        let parsed = parse_entry(&entry(program, &["whatever"])).expect("parse");
        assert_eq!(parsed, None, "program {program}");
    }
}

#[test]
fn parse_entries_skips_failures_and_irrelevant_programs() {
    let entries = vec![
        entry("/bin/mv", &["-f"]),
        entry("/usr/bin/make", &["all"]),
        entry("/usr/libexec/gcc/cc1", &["main.c", "-o", "main.s"]),
    ];

    let commands = parse_entries(&entries);
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], TypedCommand::Compile { .. }));
}
