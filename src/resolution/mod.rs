/// Reference resolution module.
///
/// Turns a reference string into a module locator and function name, and
/// a module locator into a file on disk.
mod module_file;
mod resolver;

pub use module_file::{find_module_file, module_candidates};
pub use resolver::ReferenceResolver;
