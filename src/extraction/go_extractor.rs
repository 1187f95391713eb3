/// Go functions and methods.
use crate::extraction::LanguageExtractor;

/// Locates `func` declarations, with or without a receiver, in Go sources.
pub struct GoExtractor;

impl LanguageExtractor for GoExtractor {
    fn extensions(&self) -> &[&str] {
        &["go"]
    }

    fn language_name(&self) -> &str {
        "go"
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_go::LANGUAGE.into()
    }

    fn function_kinds(&self) -> &[&str] {
        &["function_declaration", "method_declaration"]
    }
}
