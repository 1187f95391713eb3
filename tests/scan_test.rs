use std::fs;
use std::path::Path;

use funcsnip::config::LocatorConfig;
use funcsnip::extraction::LanguageRegistry;
use funcsnip::scan::TreeScanner;
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn relative_files(root: &Path, config: &LocatorConfig, registry: &LanguageRegistry) -> Vec<String> {
    TreeScanner::new(root, config, registry)
        .source_files()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_files_before_directories_then_lexicographic() {
    let dir = TempDir::new().unwrap();
    for rel in [
        "zz.py",
        "aa.py",
        "b/inner.py",
        "a/z.py",
        "a/m/deep.py",
        "a/b.py",
        "c.py",
    ] {
        touch(dir.path(), rel);
    }
    let registry = LanguageRegistry::from_names(&["python".to_string()]).unwrap();
    let files = relative_files(dir.path(), &LocatorConfig::default(), &registry);
    assert_eq!(
        files,
        vec!["aa.py", "c.py", "zz.py", "a/b.py", "a/z.py", "a/m/deep.py", "b/inner.py"]
    );
}

#[test]
fn test_only_enabled_extensions_are_yielded() {
    let dir = TempDir::new().unwrap();
    for rel in ["main.go", "lib.rs", "mod.py", "README.md", "Makefile"] {
        touch(dir.path(), rel);
    }
    let registry =
        LanguageRegistry::from_names(&["rust".to_string(), "go".to_string()]).unwrap();
    let files = relative_files(dir.path(), &LocatorConfig::default(), &registry);
    assert_eq!(files, vec!["lib.rs", "main.go"]);
}

#[test]
fn test_custom_exclude_patterns() {
    let dir = TempDir::new().unwrap();
    for rel in ["src/app.py", "tests/test_app.py", "build/gen.py"] {
        touch(dir.path(), rel);
    }
    let config = LocatorConfig {
        exclude: vec!["build/**".to_string(), "tests/**".to_string()],
        ..LocatorConfig::default()
    };
    let registry = LanguageRegistry::from_names(&config.languages).unwrap();
    let files = relative_files(dir.path(), &config, &registry);
    assert_eq!(files, vec!["src/app.py"]);
}

#[test]
fn test_empty_tree_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let registry = LanguageRegistry::new();
    assert!(relative_files(dir.path(), &LocatorConfig::default(), &registry).is_empty());
}
