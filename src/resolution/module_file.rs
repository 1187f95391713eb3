use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::config::LocatorConfig;
use crate::extraction::LanguageRegistry;
use crate::scan::TreeScanner;
use crate::types::ModuleCandidatePaths;

/// Builds the ordered candidate paths for a dotted module locator.
///
/// For each enabled language, in registry order:
/// 1. `<locator>.<ext>` -- the locator as a flat file name,
/// 2. `<locator as a/b/c>.<ext>`,
/// 3. `<locator as a/b/c>/<package init>.<ext>` when the language has a
///    package init file.
///
/// Candidates that would escape the tree root are dropped.
pub fn module_candidates(locator: &str, registry: &LanguageRegistry) -> ModuleCandidatePaths {
    let nested = locator.replace('.', "/");
    let mut paths = Vec::new();
    for extractor in registry.extractors() {
        for ext in extractor.extensions() {
            paths.push(format!("{locator}.{ext}"));
            paths.push(format!("{nested}.{ext}"));
            if let Some(init) = extractor.package_init_stem() {
                paths.push(format!("{nested}/{init}.{ext}"));
            }
        }
    }

    let mut candidates: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths.into_iter().map(PathBuf::from) {
        if !is_tree_relative(&path) {
            debug!("dropping candidate {} outside the tree", path.display());
            continue;
        }
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }
    ModuleCandidatePaths::new(candidates)
}

/// Resolves a module locator to a single file under `root`.
///
/// Tries each candidate from [`module_candidates`] and returns the first
/// regular file. Failing that, scans the tree for any source file whose
/// stem equals the locator's last segment. That fallback ignores the rest
/// of the locator, so it can pick a same-named file elsewhere in the tree.
pub fn find_module_file(
    root: &Path,
    locator: &str,
    config: &LocatorConfig,
    registry: &LanguageRegistry,
) -> Option<PathBuf> {
    for candidate in module_candidates(locator, registry).iter() {
        let full_path = root.join(candidate);
        if full_path.is_file() {
            debug!("module {} resolved to {}", locator, full_path.display());
            return Some(full_path);
        }
    }

    let stem = locator.rsplit('.').next().unwrap_or(locator);
    if stem.is_empty() {
        return None;
    }
    let found = TreeScanner::new(root, config, registry)
        .source_files()
        .find(|path| path.file_stem() == Some(OsStr::new(stem)));
    if let Some(path) = &found {
        debug!(
            "module {} resolved by stem scan to {}",
            locator,
            path.display()
        );
    }
    found
}

fn is_tree_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}
