use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::{is_excluded, LocatorConfig};
use crate::extraction::LanguageRegistry;

/// Walks a source tree in a fixed, deterministic order.
///
/// Within each directory regular files come first, sorted by name, then
/// subdirectories sorted by name; each subdirectory is finished before the
/// next one starts. Symlinks are not followed.
pub struct TreeScanner<'a> {
    root: &'a Path,
    config: &'a LocatorConfig,
    registry: &'a LanguageRegistry,
}

impl<'a> TreeScanner<'a> {
    pub fn new(root: &'a Path, config: &'a LocatorConfig, registry: &'a LanguageRegistry) -> Self {
        Self {
            root,
            config,
            registry,
        }
    }

    /// Yields absolute paths of every source file with an enabled
    /// extension that is not excluded by configuration.
    pub fn source_files(&self) -> impl Iterator<Item = PathBuf> + 'a {
        let root = self.root;
        let config = self.config;
        let registry = self.registry;
        WalkDir::new(root)
            .follow_links(false)
            .sort_by(files_before_directories)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| registry.extractor_for_file(entry.path()).is_some())
            .filter(move |entry| {
                let relative = relative_str(root, entry);
                let excluded = is_excluded(&relative, config);
                if excluded {
                    debug!("excluded {}", relative);
                }
                !excluded
            })
            .map(DirEntry::into_path)
    }
}

/// Sort key for one directory's entries: files, then directories, each by
/// file name.
fn files_before_directories(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn relative_str(root: &Path, entry: &DirEntry) -> String {
    entry
        .path()
        .strip_prefix(root)
        .unwrap_or(entry.path())
        .to_string_lossy()
        .to_string()
}
