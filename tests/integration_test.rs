//! Integration tests for fdoc
//!
//! These tests run whole builds through the lexer registry over the fixture
//! sources in `tests/fixtures` and over temporary files.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use fdoc::{
    normalize, parse_files, resolve_markers, Config, Error, Intent, LexerRegistry, ParseResult,
    ProcedureKind, SourceLocation,
};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn default_markers() -> Vec<String> {
    resolve_markers(&['>']).unwrap()
}

fn parse_fixtures() -> ParseResult {
    let lexer = LexerRegistry::with_builtin().resolve("regex").unwrap();
    let paths = vec![
        fixture("geometry.f90"),
        fixture("geometry_impl.f90"),
        fixture("driver.f90"),
    ];
    lexer.parse(&paths, &default_markers()).unwrap()
}

/// Write `sources` into a temporary directory, keeping their order
fn write_sources(sources: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = sources
        .iter()
        .map(|(name, text)| {
            let path = dir.path().join(name);
            fs::write(&path, text).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

#[test]
fn test_fixture_units() {
    let result = parse_fixtures();
    assert_eq!(result.modules().keys().collect::<Vec<_>>(), vec!["geometry"]);
    assert_eq!(
        result.submodules().keys().collect::<Vec<_>>(),
        vec!["geometry_impl"]
    );
    assert_eq!(result.programs().keys().collect::<Vec<_>>(), vec!["driver"]);
}

#[test]
fn test_fixture_module() {
    let result = parse_fixtures();
    let geometry = result.module("geometry").unwrap();
    assert_eq!(geometry.doc.as_deref(), Some("Shapes and their measurements"));
    let location = geometry.location.as_ref().unwrap();
    assert_eq!(location.lineno, 2);
    assert!(location.path.ends_with("geometry.f90"));

    let names: Vec<_> = geometry.procedures.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["distance", "shift"]);

    let distance = geometry.procedure("distance").unwrap();
    assert_eq!(distance.kind, ProcedureKind::Function);
    assert_eq!(
        distance.doc.as_deref(),
        Some("Euclidean distance between two points")
    );
    assert_eq!(distance.arguments.len(), 2);
    assert_eq!(distance.arguments[0].doc.as_deref(), Some("first point"));
    assert_eq!(distance.arguments[1].doc.as_deref(), Some("second point"));
    assert_eq!(
        distance.arguments[0].decl.as_deref(),
        Some("type(point), intent(in)")
    );
    let result_var = distance.result.as_ref().unwrap();
    assert_eq!(result_var.name, "d");
    assert_eq!(result_var.decl.as_deref(), Some("real"));

    let shift = geometry.procedure("shift").unwrap();
    assert_eq!(shift.kind, ProcedureKind::Subroutine);
    assert_eq!(shift.doc.as_deref(), Some("Move a point along x"));
    assert_eq!(shift.argument("p").unwrap().intent, Intent::InOut);
    assert_eq!(shift.argument("dx").unwrap().intent, Intent::In);
    assert!(shift.result.is_none());
}

#[test]
fn test_fixture_type_and_interface() {
    let result = parse_fixtures();
    let geometry = result.module("geometry").unwrap();

    let point = geometry.derived_type("point").unwrap();
    assert_eq!(point.doc.as_deref(), Some("A 2-D point"));
    assert!(point.extends.is_none());
    let docs: Vec<_> = point
        .components
        .iter()
        .map(|c| (c.name.as_str(), c.doc.as_deref()))
        .collect();
    assert_eq!(
        docs,
        vec![("x", Some("abscissa")), ("y", Some("ordinate"))]
    );

    assert_eq!(geometry.interfaces.len(), 1);
    let area = &geometry.interfaces[0];
    assert_eq!(area.name, "circle_area");
    assert_eq!(area.doc.as_deref(), Some("Area of a circle"));
    assert_eq!(area.arguments[0].doc.as_deref(), Some("radius"));
    assert_eq!(area.result.as_ref().unwrap().name, "a");
    assert_eq!(
        area.signature.as_deref(),
        Some("module function circle_area(r) -> a")
    );

    assert_eq!(geometry.generics.len(), 1);
    let generic = geometry.generic("move").unwrap();
    assert_eq!(generic.doc.as_deref(), Some("Move any point along x"));
    assert_eq!(generic.procedures, vec!["shift"]);
    assert_eq!(generic.location.as_ref().unwrap().lineno, 21);
}

#[test]
fn test_fixture_submodule() {
    let result = parse_fixtures();
    let imp = result.submodule("geometry_impl").unwrap();
    assert_eq!(imp.parent_module, "geometry");
    assert_eq!(
        imp.doc.as_deref(),
        Some("Implementations of the geometry procedures")
    );

    let names: Vec<_> = imp.procedures.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["clamp"]);
    let clamp = &imp.procedures[0];
    assert_eq!(clamp.doc.as_deref(), Some("Clamp a value into [lo, hi]"));
    assert_eq!(clamp.result.as_ref().unwrap().name, "clamp");
    assert!(clamp.argument("clamp").is_none());
    for arg in &clamp.arguments {
        assert_eq!(arg.intent, Intent::In);
        assert_eq!(arg.decl.as_deref(), Some("real, intent(in)"));
    }
}

#[test]
fn test_fixture_program() {
    let result = parse_fixtures();
    let driver = result.program("driver").unwrap();
    assert_eq!(
        driver.doc.as_deref(),
        Some("Prints the distance between two points")
    );
    let deps: Vec<_> = driver.dependencies.iter().map(String::as_str).collect();
    assert_eq!(deps, vec!["geometry", "iso_fortran_env"]);
    assert!(driver.procedures.is_empty());
    let source = driver.source.as_deref().unwrap();
    assert!(source.starts_with("program driver"));
    assert!(source.ends_with("end program driver"));
}

#[test]
fn test_simple_module_location() {
    let (_dir, paths) = write_sources(&[("foo.f90", "!> doc\nmodule foo\nend module foo\n")]);
    let result = parse_files(&paths, &default_markers()).unwrap();
    let foo = result.module("foo").unwrap();
    assert_eq!(foo.name, "foo");
    assert_eq!(foo.doc.as_deref(), Some("doc"));
    assert_eq!(
        foo.location,
        Some(SourceLocation::new(paths[0].to_string_lossy(), 2))
    );
}

#[test]
fn test_first_file_wins_collisions() {
    let (_dir, paths) = write_sources(&[
        ("a.f90", "!> from a\nmodule foo\nend module foo\n"),
        ("b.f90", "!> from b\nmodule foo\nend module foo\n"),
    ]);
    let result = parse_files(&paths, &default_markers()).unwrap();
    assert_eq!(result.modules().len(), 1);
    assert_eq!(result.module("foo").unwrap().doc.as_deref(), Some("from a"));

    let reversed: Vec<PathBuf> = paths.iter().rev().cloned().collect();
    let result = parse_files(&reversed, &default_markers()).unwrap();
    assert_eq!(result.module("foo").unwrap().doc.as_deref(), Some("from b"));
}

#[test]
fn test_module_procedure_only() {
    let (_dir, paths) = write_sources(&[("p.f90", "module procedure sub1\n")]);
    let result = parse_files(&paths, &default_markers()).unwrap();
    assert!(result.module("procedure").is_none());
    assert!(result.is_empty());
}

#[test]
fn test_inline_argument_doc() {
    let (_dir, paths) = write_sources(&[(
        "s.f90",
        "module m\ncontains\nsubroutine s(a)\n  integer, intent(in) :: a !> the value\nend subroutine s\nend module m\n",
    )]);
    let result = parse_files(&paths, &default_markers()).unwrap();
    let s = result.module("m").unwrap().procedure("s").unwrap();
    assert!(s.doc.is_none());
    assert_eq!(s.arguments[0].doc.as_deref(), Some("the value"));
}

#[test]
fn test_custom_doc_chars() {
    let (_dir, paths) = write_sources(&[(
        "m.f90",
        "!* star doc\nmodule m\nend module m\n!> other\nmodule n\nend module n\n",
    )]);
    let markers = resolve_markers(&['*']).unwrap();
    let result = parse_files(&paths, &markers).unwrap();
    assert_eq!(result.module("m").unwrap().doc.as_deref(), Some("star doc"));
    assert!(result.module("n").unwrap().doc.is_none());
}

#[test]
fn test_missing_file_is_source_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.f90");
    let err = parse_files(&[missing.clone()], &default_markers()).unwrap_err();
    match err {
        Error::SourceRead { path, .. } => assert_eq!(path, missing),
        other @ Error::Configuration(_) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_earliest_unreadable_file_is_reported() {
    let (dir, mut paths) = write_sources(&[("ok.f90", "module ok\nend module ok\n")]);
    let first_missing = dir.path().join("first_missing.f90");
    let later_missing: Vec<PathBuf> = (0..16)
        .map(|i| dir.path().join(format!("later_{i}.f90")))
        .collect();
    paths.push(first_missing.clone());
    paths.extend(later_missing);

    for _ in 0..8 {
        match parse_files(&paths, &default_markers()).unwrap_err() {
            Error::SourceRead { path, .. } => assert_eq!(path, first_missing),
            other @ Error::Configuration(_) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_empty_input_list() {
    let result = parse_files(&[], &default_markers()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_normalized_docs() {
    let (_dir, paths) = write_sources(&[(
        "n.f90",
        "!> Summary line\n!>\n!> ## Notes\n!> Details here\nmodule notes\nend module notes\n",
    )]);
    let result = parse_files(&paths, &default_markers()).unwrap();
    let raw = result.module("notes").unwrap().doc.clone().unwrap();
    assert!(raw.contains("## Notes"));

    let normalized = result.map_docs(normalize);
    let doc = normalized.module("notes").unwrap().doc.as_deref().unwrap();
    assert_eq!(doc, normalize(&raw));
    assert!(doc.starts_with("Summary line"));
    assert!(doc.contains(".. rubric:: Notes"));
    assert!(!doc.contains("## "));
    assert!(doc.ends_with("Details here"));
}

#[test]
fn test_config_driven_build() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fdoc.toml"), "doc_chars = \">*\"\n").unwrap();
    let config = Config::from_discovered_files(dir.path());
    assert!(config.validate().is_none());

    let src = dir.path().join("m.f90");
    fs::write(&src, "!* starred\nmodule m\nend module m\n").unwrap();
    let lexer = LexerRegistry::with_builtin().resolve(&config.lexer).unwrap();
    let result = lexer.parse(&[src], &config.doc_markers().unwrap()).unwrap();
    assert_eq!(result.module("m").unwrap().doc.as_deref(), Some("starred"));
}

#[test]
fn test_result_serializes_to_json() {
    let result = parse_fixtures();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json["modules"]["geometry"]["procedures"][0]["name"],
        "distance"
    );
    assert_eq!(json["programs"]["driver"]["dependencies"][0], "geometry");
    assert_eq!(json["modules"]["geometry"]["generics"][0]["name"], "move");
    assert_eq!(
        json["modules"]["geometry"]["procedures"][0]["signature"],
        "function distance(p, q) -> d"
    );
}
