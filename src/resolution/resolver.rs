use crate::errors::{LocateError, Result};
use crate::types::FunctionReference;

/// Parses human-supplied function references.
///
/// Three syntaxes are accepted, checked in this order:
/// 1. `path/to/module:function` -- slashes in the path become dots.
/// 2. `package.module.function` -- split on the last dot.
/// 3. `function` -- no module; every source file is searched.
///
/// Identifier characters are not validated.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Splits `reference` into a module locator and a function name.
    ///
    /// Fails with `MalformedReference` when the function name would be
    /// empty or the reference contains more than one `:`. An empty module
    /// part (`":f"`, `".f"`) leaves the reference unscoped.
    pub fn resolve(reference: &str) -> Result<FunctionReference> {
        if reference.is_empty() {
            return Err(LocateError::malformed(reference, "reference is empty"));
        }

        let (locator, function_name) = if let Some((path_part, name)) = reference.split_once(':')
        {
            if name.contains(':') {
                return Err(LocateError::malformed(
                    reference,
                    "expected at most one ':' separating module path and function",
                ));
            }
            (Some(path_part.replace('/', ".")), name)
        } else if let Some((module_part, name)) = reference.rsplit_once('.') {
            (Some(module_part.to_string()), name)
        } else {
            (None, reference)
        };

        if function_name.is_empty() {
            return Err(LocateError::malformed(reference, "function name is empty"));
        }

        Ok(FunctionReference {
            module_locator: locator.filter(|l| !l.is_empty()),
            function_name: function_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_takes_priority_over_dots() {
        let r = ReferenceResolver::resolve("pkg/sub.mod:run").unwrap();
        assert_eq!(r.module_locator.as_deref(), Some("pkg.sub.mod"));
        assert_eq!(r.function_name, "run");
    }

    #[test]
    fn display_renders_dotted_form() {
        let r = ReferenceResolver::resolve("a/b:c").unwrap();
        assert_eq!(r.to_string(), "a.b.c");
    }
}
