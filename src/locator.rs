use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LocatorConfig;
use crate::errors::{LocateError, Result};
use crate::extraction::{extract_function, LanguageRegistry, SkipReason};
use crate::resolution::{find_module_file, module_candidates, ReferenceResolver};
use crate::scan::TreeScanner;
use crate::types::*;

/// Cooperative cancellation flag for long unscoped scans.
///
/// Checked between files only; a parse in progress always completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Finds function definitions in a source tree from a reference string.
///
/// Holds only immutable settings, so one locator can serve lookups on many
/// trees concurrently. Nothing under a tree root is ever written.
pub struct SourceLocator {
    config: LocatorConfig,
    registry: LanguageRegistry,
    cancel: Option<CancellationToken>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl SourceLocator {
    /// Creates a locator for the languages enabled in `config`.
    pub fn new(config: LocatorConfig) -> Result<Self> {
        let registry = LanguageRegistry::from_names(&config.languages)?;
        Ok(Self {
            config,
            registry,
            cancel: None,
        })
    }

    /// Attaches a cancellation token checked before each file is parsed.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Returns the enabled language registry.
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(LocateError::Cancelled),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-file and per-module lookups
// ---------------------------------------------------------------------------

impl SourceLocator {
    /// Finds the first definition of `function_name` in one file.
    ///
    /// Files that cannot be read, decoded or parsed are logged and treated
    /// as containing no match.
    pub fn find_function_in_file(&self, path: &Path, function_name: &str) -> Option<FunctionMatch> {
        match self.try_find_function_in_file(path, function_name) {
            Ok(found) => found,
            Err(reason) => {
                warn!("Error parsing {}: {}", path.display(), reason);
                None
            }
        }
    }

    /// Like [`find_function_in_file`](Self::find_function_in_file) but
    /// reports why a file was skipped.
    pub fn try_find_function_in_file(
        &self,
        path: &Path,
        function_name: &str,
    ) -> std::result::Result<Option<FunctionMatch>, SkipReason> {
        let extractor = self
            .registry
            .extractor_for_file(path)
            .ok_or(SkipReason::Unsupported)?;

        let size = fs::metadata(path)
            .map_err(|e| SkipReason::Read(e.to_string()))?
            .len();
        if size > self.config.max_file_size {
            return Err(SkipReason::TooLarge {
                size,
                limit: self.config.max_file_size,
            });
        }

        let bytes = fs::read(path).map_err(|e| SkipReason::Read(e.to_string()))?;
        let source = String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)?;

        extract_function(
            extractor,
            &source,
            function_name,
            self.config.include_decorators,
        )
    }

    /// Resolves a dotted module locator to a file under `root`.
    pub fn find_module_file(&self, root: &Path, locator: &str) -> Option<PathBuf> {
        find_module_file(root, locator, &self.config, &self.registry)
    }

    /// Returns every enabled source file under `root` in scan order.
    pub fn source_files(&self, root: &Path) -> Vec<PathBuf> {
        TreeScanner::new(root, &self.config, &self.registry)
            .source_files()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Reference lookups
// ---------------------------------------------------------------------------

impl SourceLocator {
    /// Looks up `reference` under `root`, keeping the reason for a miss.
    ///
    /// A scoped reference searches exactly one file. An unscoped reference
    /// searches every source file in scan order and returns the first
    /// match, so an ambiguous name resolves to whichever file comes first.
    pub fn locate(&self, root: &Path, reference: &str) -> Result<LookupOutcome> {
        if !root.is_dir() {
            return Err(LocateError::TreeNotFound {
                path: root.display().to_string(),
            });
        }
        let parsed = ReferenceResolver::resolve(reference)?;
        let function_name = parsed.function_name.as_str();

        let outcome = match &parsed.module_locator {
            Some(locator) => {
                let Some(module_file) = self.find_module_file(root, locator) else {
                    let candidates = module_candidates(locator, &self.registry);
                    warn!(
                        "Module {} not found under {} (tried {})",
                        locator,
                        root.display(),
                        candidates.display_list()
                    );
                    return Ok(LookupOutcome::ModuleNotFound {
                        locator: locator.clone(),
                        candidates,
                    });
                };
                self.check_cancelled()?;
                match self.find_function_in_file(&module_file, function_name) {
                    Some(matched) => LookupOutcome::Found {
                        path: module_file,
                        matched,
                    },
                    None => LookupOutcome::FunctionNotFound {
                        function_name: function_name.to_string(),
                        files_searched: 1,
                    },
                }
            }
            None => self.scan_tree(root, function_name)?,
        };

        match &outcome {
            LookupOutcome::Found { path, matched } => info!(
                "Found function {} in {} (lines {}-{})",
                function_name,
                path.display(),
                matched.start_line,
                matched.end_line
            ),
            LookupOutcome::FunctionNotFound { files_searched, .. } => warn!(
                "Function {} not found under {} ({} files searched)",
                reference,
                root.display(),
                files_searched
            ),
            LookupOutcome::ModuleNotFound { .. } => {}
        }
        Ok(outcome)
    }

    /// Returns the source text of `reference` under `root`, or `None` when
    /// the module or function cannot be found.
    pub fn get_function_code(&self, root: &Path, reference: &str) -> Result<Option<String>> {
        Ok(self
            .locate(root, reference)?
            .into_match()
            .map(|matched| matched.source_text))
    }

    fn scan_tree(&self, root: &Path, function_name: &str) -> Result<LookupOutcome> {
        let mut files_searched = 0;
        for path in TreeScanner::new(root, &self.config, &self.registry).source_files() {
            self.check_cancelled()?;
            files_searched += 1;
            debug!("searching {} for {}", path.display(), function_name);
            if let Some(matched) = self.find_function_in_file(&path, function_name) {
                return Ok(LookupOutcome::Found { path, matched });
            }
        }
        Ok(LookupOutcome::FunctionNotFound {
            function_name: function_name.to_string(),
            files_searched,
        })
    }
}
