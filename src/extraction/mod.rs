mod go_extractor;
mod java_extractor;
/// Tree-sitter based function span extraction.
///
/// Each supported language contributes a grammar, the node kinds that
/// count as function definitions, and its module layout conventions. The
/// walk that finds a definition and slices its lines is shared.
mod python_extractor;
mod rust_extractor;

pub use go_extractor::GoExtractor;
pub use java_extractor::JavaExtractor;
pub use python_extractor::PythonExtractor;
pub use rust_extractor::RustExtractor;

use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node as TsNode, Parser, Tree};

use crate::errors::{LocateError, Result};
use crate::types::FunctionMatch;

/// Trait for language-specific function locators.
pub trait LanguageExtractor: Send + Sync {
    /// File extensions this extractor handles (without leading dot).
    fn extensions(&self) -> &[&str];

    /// Lower-case language name used in configuration.
    fn language_name(&self) -> &str;

    /// The tree-sitter grammar for this language.
    fn grammar(&self) -> tree_sitter::Language;

    /// Node kinds that are function definitions.
    fn function_kinds(&self) -> &[&str];

    /// File stem of a package's default module (`__init__`, `mod`), if the
    /// language has one.
    fn package_init_stem(&self) -> Option<&str> {
        None
    }

    /// Returns the declared name of a function definition node.
    fn function_name(&self, node: TsNode<'_>, source: &[u8]) -> Option<String> {
        node.child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .map(str::to_string)
    }

    /// Returns the first line (0-based row) of decorators or attributes
    /// attached to `node`, if any.
    fn decorator_start_row(&self, _node: TsNode<'_>) -> Option<usize> {
        None
    }
}

/// Why a file was skipped during a lookup. Never fatal to a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("file is not valid UTF-8")]
    NotUtf8,

    #[error("syntax error at line {line}")]
    Syntax { line: usize },

    #[error("no grammar for this file")]
    Unsupported,

    #[error("parser failed: {0}")]
    Parser(String),

    #[error("read failed: {0}")]
    Read(String),
}

/// Parses `source` and returns the first definition of `function_name` in
/// depth-first pre-order, with its exact source text.
///
/// Trees containing syntax errors are rejected rather than searched.
pub fn extract_function(
    extractor: &dyn LanguageExtractor,
    source: &str,
    function_name: &str,
    include_decorators: bool,
) -> std::result::Result<Option<FunctionMatch>, SkipReason> {
    let tree = parse_source(extractor, source)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(SkipReason::Syntax {
            line: first_error_row(root).map_or(0, |row| row + 1),
        });
    }

    let bytes = source.as_bytes();
    let Some(node) = find_definition(extractor, root, bytes, function_name) else {
        return Ok(None);
    };

    let mut start_row = node.start_position().row;
    if include_decorators {
        if let Some(row) = extractor.decorator_start_row(node) {
            start_row = start_row.min(row);
        }
    }
    let end = node.end_position();
    // A node ending at column 0 stops on the previous line's terminator.
    let end_row = if end.column == 0 && end.row > start_row {
        end.row - 1
    } else {
        end.row
    };

    let start_line = start_row + 1;
    let end_line = end_row + 1;
    Ok(Some(FunctionMatch {
        source_text: slice_lines(source, start_line, end_line),
        start_line,
        end_line,
    }))
}

/// Returns lines `[start_line, end_line]` (1-based, inclusive) verbatim,
/// line terminators included.
pub fn slice_lines(source: &str, start_line: usize, end_line: usize) -> String {
    if start_line == 0 || end_line < start_line {
        return String::new();
    }
    source
        .split_inclusive('\n')
        .skip(start_line - 1)
        .take(end_line - start_line + 1)
        .collect()
}

/// Parse source code into a tree-sitter AST.
fn parse_source(
    extractor: &dyn LanguageExtractor,
    source: &str,
) -> std::result::Result<Tree, SkipReason> {
    let mut parser = Parser::new();
    parser.set_language(&extractor.grammar()).map_err(|e| {
        SkipReason::Parser(format!(
            "failed to load {} grammar: {e}",
            extractor.language_name()
        ))
    })?;
    parser
        .parse(source, None)
        .ok_or_else(|| SkipReason::Parser("tree-sitter parse returned None".to_string()))
}

/// Pre-order walk returning the first function definition named `name`.
fn find_definition<'t>(
    extractor: &dyn LanguageExtractor,
    root: TsNode<'t>,
    source: &[u8],
    name: &str,
) -> Option<TsNode<'t>> {
    let kinds = extractor.function_kinds();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if kinds.contains(&node.kind())
            && extractor.function_name(node, source).as_deref() == Some(name)
        {
            return Some(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Row of the first `ERROR` or missing node, for diagnostics.
fn first_error_row(root: TsNode<'_>) -> Option<usize> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Registry of the enabled language extractors.
///
/// Order is significant: it decides which extension is probed first when
/// resolving a module locator.
pub struct LanguageRegistry {
    extractors: Vec<Box<dyn LanguageExtractor>>,
}

impl LanguageRegistry {
    /// Creates a registry with every built-in extractor, Python first.
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(PythonExtractor),
                Box::new(RustExtractor),
                Box::new(GoExtractor),
                Box::new(JavaExtractor),
            ],
        }
    }

    /// Creates a registry holding the named languages in the given order.
    pub fn from_names(names: &[String]) -> Result<Self> {
        let mut extractors: Vec<Box<dyn LanguageExtractor>> = Vec::new();
        for name in names {
            let extractor: Box<dyn LanguageExtractor> = match name.to_ascii_lowercase().as_str() {
                "python" => Box::new(PythonExtractor),
                "rust" => Box::new(RustExtractor),
                "go" => Box::new(GoExtractor),
                "java" => Box::new(JavaExtractor),
                other => {
                    return Err(LocateError::Config {
                        message: format!("unsupported language '{other}'"),
                    })
                }
            };
            if !extractors
                .iter()
                .any(|e| e.language_name() == extractor.language_name())
            {
                extractors.push(extractor);
            }
        }
        if extractors.is_empty() {
            return Err(LocateError::Config {
                message: "no languages enabled".to_string(),
            });
        }
        Ok(Self { extractors })
    }

    /// Returns the extractor for a file path based on its extension.
    pub fn extractor_for_file(&self, path: &Path) -> Option<&dyn LanguageExtractor> {
        let ext = path.extension()?.to_str()?;
        self.extractors
            .iter()
            .find(|e| e.extensions().contains(&ext))
            .map(|e| e.as_ref())
    }

    /// Returns all enabled extractors in priority order.
    pub fn extractors(&self) -> impl Iterator<Item = &dyn LanguageExtractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }

    /// Returns all supported file extensions across all extractors.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
