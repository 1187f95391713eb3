/// Python function definitions, including methods and nested functions.
use tree_sitter::Node as TsNode;

use crate::extraction::LanguageExtractor;

/// Locates `def` and `async def` definitions in Python sources.
pub struct PythonExtractor;

impl LanguageExtractor for PythonExtractor {
    fn extensions(&self) -> &[&str] {
        &["py"]
    }

    fn language_name(&self) -> &str {
        "python"
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn function_kinds(&self) -> &[&str] {
        &["function_definition"]
    }

    fn package_init_stem(&self) -> Option<&str> {
        Some("__init__")
    }

    /// Decorators live on a wrapping `decorated_definition` node.
    fn decorator_start_row(&self, node: TsNode<'_>) -> Option<usize> {
        let parent = node.parent()?;
        if parent.kind() == "decorated_definition" {
            Some(parent.start_position().row)
        } else {
            None
        }
    }
}
