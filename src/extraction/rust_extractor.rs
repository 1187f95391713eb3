/// Rust function items: free functions, methods in `impl` and default
/// trait methods.
use tree_sitter::Node as TsNode;

use crate::extraction::LanguageExtractor;

/// Locates `fn` items with bodies in Rust sources.
pub struct RustExtractor;

impl LanguageExtractor for RustExtractor {
    fn extensions(&self) -> &[&str] {
        &["rs"]
    }

    fn language_name(&self) -> &str {
        "rust"
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_rust::LANGUAGE.into()
    }

    fn function_kinds(&self) -> &[&str] {
        &["function_item"]
    }

    fn package_init_stem(&self) -> Option<&str> {
        Some("mod")
    }

    /// Outer attributes are preceding `attribute_item` siblings. Only the
    /// contiguous run directly above the item counts; a comment breaks it.
    fn decorator_start_row(&self, node: TsNode<'_>) -> Option<usize> {
        let mut first = None;
        let mut current = node.prev_sibling();
        while let Some(sibling) = current {
            if sibling.kind() != "attribute_item" {
                break;
            }
            first = Some(sibling.start_position().row);
            current = sibling.prev_sibling();
        }
        first
    }
}
