use std::fs;
use std::path::Path;

use funcsnip::config::LocatorConfig;
use funcsnip::errors::LocateError;
use funcsnip::extraction::LanguageRegistry;
use funcsnip::resolution::{find_module_file, module_candidates, ReferenceResolver};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn python_registry() -> LanguageRegistry {
    LanguageRegistry::from_names(&["python".to_string()]).unwrap()
}

// ---------------------------------------------------------------------------
// Reference syntaxes
// ---------------------------------------------------------------------------

#[test]
fn test_bare_name_is_unscoped() {
    for reference in ["foo", "do_work", "_private", "Ünïcode"] {
        let r = ReferenceResolver::resolve(reference).unwrap();
        assert_eq!(r.module_locator, None);
        assert_eq!(r.function_name, reference);
        assert!(!r.is_scoped());
    }
}

#[test]
fn test_dotted_splits_on_last_dot() {
    let r = ReferenceResolver::resolve("a.b.c").unwrap();
    assert_eq!(r.module_locator.as_deref(), Some("a.b"));
    assert_eq!(r.function_name, "c");

    let r = ReferenceResolver::resolve("pkg.mod.foo").unwrap();
    assert_eq!(r.module_locator.as_deref(), Some("pkg.mod"));
    assert_eq!(r.function_name, "foo");
}

#[test]
fn test_path_colon_form_converts_slashes() {
    let r = ReferenceResolver::resolve("x/y:f").unwrap();
    assert_eq!(r.module_locator.as_deref(), Some("x.y"));
    assert_eq!(r.function_name, "f");
}

#[test]
fn test_path_and_dotted_forms_agree() {
    let dotted = ReferenceResolver::resolve("pkg.mod.foo").unwrap();
    let pathed = ReferenceResolver::resolve("pkg/mod:foo").unwrap();
    assert_eq!(dotted, pathed);
}

#[test]
fn test_empty_module_part_is_unscoped() {
    let r = ReferenceResolver::resolve(":foo").unwrap();
    assert_eq!(r.module_locator, None);
    assert_eq!(r.function_name, "foo");

    let r = ReferenceResolver::resolve(".foo").unwrap();
    assert_eq!(r.module_locator, None);
    assert_eq!(r.function_name, "foo");
}

#[test]
fn test_empty_function_name_is_malformed() {
    for reference in ["", "pkg.mod.", "pkg/mod:", ":"] {
        let err = ReferenceResolver::resolve(reference).unwrap_err();
        assert!(
            matches!(err, LocateError::MalformedReference { .. }),
            "expected malformed for {reference:?}, got {err:?}"
        );
    }
}

#[test]
fn test_multiple_colons_are_malformed() {
    let err = ReferenceResolver::resolve("crate::net::connect").unwrap_err();
    assert!(matches!(err, LocateError::MalformedReference { .. }));
}

// ---------------------------------------------------------------------------
// Module candidates
// ---------------------------------------------------------------------------

#[test]
fn test_candidate_order_for_python() {
    let candidates = module_candidates("pkg.mod", &python_registry());
    let paths: Vec<String> = candidates
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    assert_eq!(
        paths,
        vec!["pkg.mod.py", "pkg/mod.py", "pkg/mod/__init__.py"]
    );
}

#[test]
fn test_candidates_follow_language_order() {
    let registry =
        LanguageRegistry::from_names(&["rust".to_string(), "go".to_string()]).unwrap();
    let candidates = module_candidates("net", &registry);
    let paths: Vec<String> = candidates
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    assert_eq!(paths, vec!["net.rs", "net/mod.rs", "net.go"]);
}

// ---------------------------------------------------------------------------
// Module files on disk
// ---------------------------------------------------------------------------

#[test]
fn test_flat_filename_wins_over_nested() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pkg.mod.py", "def foo():\n    return 0\n");
    write(dir.path(), "pkg/mod.py", "def foo():\n    return 1\n");

    let found = find_module_file(
        dir.path(),
        "pkg.mod",
        &LocatorConfig::default(),
        &python_registry(),
    )
    .unwrap();
    assert_eq!(found, dir.path().join("pkg.mod.py"));
}

#[test]
fn test_nested_module_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pkg/mod.py", "def foo():\n    return 1\n");

    let found = find_module_file(
        dir.path(),
        "pkg.mod",
        &LocatorConfig::default(),
        &python_registry(),
    )
    .unwrap();
    assert_eq!(found, dir.path().join("pkg/mod.py"));
}

#[test]
fn test_package_init_module() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pkg/__init__.py", "def setup():\n    pass\n");

    let found = find_module_file(
        dir.path(),
        "pkg",
        &LocatorConfig::default(),
        &python_registry(),
    )
    .unwrap();
    assert_eq!(found, dir.path().join("pkg/__init__.py"));
}

#[test]
fn test_directory_named_like_candidate_is_not_a_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("odd.py")).unwrap();
    write(dir.path(), "lib/odd.py", "def f():\n    pass\n");

    let found = find_module_file(
        dir.path(),
        "odd",
        &LocatorConfig::default(),
        &python_registry(),
    )
    .unwrap();
    assert_eq!(found, dir.path().join("lib/odd.py"));
}

#[test]
fn test_stem_fallback_ignores_rest_of_locator() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/deep/utils.py", "def helper():\n    pass\n");

    let found = find_module_file(
        dir.path(),
        "some.other.utils",
        &LocatorConfig::default(),
        &python_registry(),
    )
    .unwrap();
    assert_eq!(found, dir.path().join("src/deep/utils.py"));
}

#[test]
fn test_stem_fallback_uses_scan_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b/utils.py", "");
    write(dir.path(), "a/z/utils.py", "");
    write(dir.path(), "a/utils.py", "");

    let found = find_module_file(
        dir.path(),
        "utils",
        &LocatorConfig::default(),
        &python_registry(),
    )
    .unwrap();
    assert_eq!(found, dir.path().join("a/utils.py"));
}

#[test]
fn test_stem_fallback_requires_enabled_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "docs/utils.txt", "def helper(): pass\n");

    let found = find_module_file(
        dir.path(),
        "utils",
        &LocatorConfig::default(),
        &python_registry(),
    );
    assert!(found.is_none());
}

#[test]
fn test_module_not_found() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pkg/mod.py", "def foo():\n    return 1\n");

    let found = find_module_file(
        dir.path(),
        "nowhere.at_all",
        &LocatorConfig::default(),
        &python_registry(),
    );
    assert!(found.is_none());
}
