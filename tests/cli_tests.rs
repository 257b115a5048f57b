#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;

use wadlgen::cli::{self, RawLocation, Scan};

const WADL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<application xmlns="http://wadl.dev.java.net/2009/02">
    <resources base="http://example.com/api/">
        <resource path="users" id="users">
            <method name="GET" id="list-users"/>
        </resource>
    </resources>
</application>"#;

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

fn dir_is_empty(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn test_missing_required_options_print_usage() {
    let out = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, WADL).unwrap();

    // No -p.
    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        wadl.to_str().unwrap(),
    ]));
    assert_eq!(status, 0);
    // The engine was never invoked.
    assert!(dir_is_empty(out.path()));

    // No -o.
    let status = cli::run(&args(&["-p", "api", wadl.to_str().unwrap()]));
    assert_eq!(status, 0);
    assert!(dir_is_empty(out.path()));
}

#[test]
fn test_unknown_option_exits_zero() {
    let out = tempfile::tempdir().unwrap();
    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        "--bogus",
        "-p",
        "api",
        "app.wadl",
    ]));
    assert_eq!(status, 0);
    assert!(dir_is_empty(out.path()));
}

#[test]
fn test_missing_input_file_exits_one() {
    let out = tempfile::tempdir().unwrap();
    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        "-p",
        "api",
        "/nonexistent/app.wadl",
    ]));
    assert_eq!(status, 1);
    assert!(dir_is_empty(out.path()));
}

#[test]
fn test_missing_output_directory_exits_one() {
    let input = tempfile::tempdir().unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, WADL).unwrap();

    let status = cli::run(&args(&[
        "-o",
        "/nonexistent/out",
        "-p",
        "api",
        wadl.to_str().unwrap(),
    ]));
    assert_eq!(status, 1);
}

#[test]
fn test_missing_customization_exits_one() {
    let out = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, WADL).unwrap();

    // Input and output are valid; the failure is specifically the
    // customization file.
    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        "-p",
        "api",
        "-c",
        "/nonexistent/bindings.xml",
        wadl.to_str().unwrap(),
    ]));
    assert_eq!(status, 1);
    assert!(dir_is_empty(out.path()));
}

#[test]
fn test_remote_location_skips_validation() {
    // The output directory does not exist, which would fail validation for
    // a local input; for a remote one the checks are skipped entirely and
    // the engine's rejection still exits 0.
    let status = cli::run(&args(&[
        "-o",
        "/nonexistent/out",
        "-p",
        "api",
        "http://example.com/app.wadl",
    ]));
    assert_eq!(status, 0);
}

#[test]
fn test_remote_location_reaches_engine_unchanged() {
    match cli::resolve_location("http://example.com/app.wadl").unwrap() {
        RawLocation::Remote(url) => assert_eq!(url.as_str(), "http://example.com/app.wadl"),
        other => panic!("expected remote, got {:?}", other),
    }
}

#[test]
fn test_relative_location_is_normalized() {
    let input = tempfile::tempdir().unwrap();
    fs::create_dir(input.path().join("sub")).unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, WADL).unwrap();

    // A dotted path canonicalizes to an absolute file URL.
    let dotted = input.path().join("sub/../app.wadl");
    let url = cli::file_url(&dotted).unwrap();
    assert_eq!(url.scheme(), "file");
    assert!(!url.path().contains(".."));
    assert!(url.path().ends_with("app.wadl"));
}

#[test]
fn test_customization_order_is_preserved() {
    match cli::scan_args(&args(&["-o", "o", "-p", "p", "-c", "a", "-c", "b", "w"])) {
        Scan::Options(options) => {
            assert_eq!(
                options.customizations,
                vec![Path::new("a").to_path_buf(), Path::new("b").to_path_buf()]
            );
        }
        other => panic!("expected options, got {:?}", other),
    }
}

#[test]
fn test_successful_generation() {
    let out = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, WADL).unwrap();

    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        "-p",
        "api.client",
        wadl.to_str().unwrap(),
    ]));
    assert_eq!(status, 0);

    let source = fs::read_to_string(out.path().join("api/client/mod.rs")).unwrap();
    assert!(source.contains("pub struct Users {"));
}

#[test]
fn test_engine_failure_still_exits_zero() {
    // Filesystem validation failures exit 1, but a failure inside the
    // engine (here: an unparseable description) exits 0.
    let out = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, "this is not xml").unwrap();

    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        "-p",
        "api",
        wadl.to_str().unwrap(),
    ]));
    assert_eq!(status, 0);
    assert!(dir_is_empty(out.path()));
}

#[test]
fn test_unknown_binding_argument_exits_zero() {
    let out = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let wadl = input.path().join("app.wadl");
    fs::write(&wadl, WADL).unwrap();

    let status = cli::run(&args(&[
        "-o",
        out.path().to_str().unwrap(),
        "-p",
        "api",
        "-xjcArgument",
        "-npa",
        wadl.to_str().unwrap(),
    ]));
    assert_eq!(status, 0);
    assert!(dir_is_empty(out.path()));
}
