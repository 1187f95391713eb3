use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A parsed function reference: an optional module locator and a name.
///
/// `module_locator` is always dotted (`pkg.mod`), never empty, and never
/// contains the function name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionReference {
    pub module_locator: Option<String>,
    pub function_name: String,
}

impl FunctionReference {
    /// Returns `true` if the reference names a module to search.
    pub fn is_scoped(&self) -> bool {
        self.module_locator.is_some()
    }
}

impl fmt::Display for FunctionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module_locator {
            Some(locator) => write!(f, "{}.{}", locator, self.function_name),
            None => write!(f, "{}", self.function_name),
        }
    }
}

/// Ordered candidate paths (relative to the tree root) for a module locator.
///
/// The first candidate that exists on disk wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleCandidatePaths {
    paths: Vec<PathBuf>,
}

impl ModuleCandidatePaths {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Renders the candidates as a comma separated list for log output.
    pub fn display_list(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The exact source text of a matched function and its line span.
///
/// Lines are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMatch {
    pub source_text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Result of a lookup, keeping the reason for a miss for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A definition was found in `path`.
    Found { path: PathBuf, matched: FunctionMatch },
    /// The module locator resolved to no file.
    ModuleNotFound {
        locator: String,
        candidates: ModuleCandidatePaths,
    },
    /// Every searched file parsed (or was skipped) without a match.
    FunctionNotFound {
        function_name: String,
        files_searched: usize,
    },
}

impl LookupOutcome {
    /// Collapses the outcome to the matched function, if any.
    pub fn into_match(self) -> Option<FunctionMatch> {
        match self {
            LookupOutcome::Found { matched, .. } => Some(matched),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }
}
