/// Java methods and constructors.
///
/// Annotations sit inside the declaration's `modifiers`, so they are always
/// part of the span.
use crate::extraction::LanguageExtractor;

pub struct JavaExtractor;

impl LanguageExtractor for JavaExtractor {
    fn extensions(&self) -> &[&str] {
        &["java"]
    }

    fn language_name(&self) -> &str {
        "java"
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }

    fn function_kinds(&self) -> &[&str] {
        &["method_declaration", "constructor_declaration"]
    }
}
