use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use funcsnip::config::{get_config_path, load_config, save_config, LocatorConfig};
use funcsnip::locator::SourceLocator;
use funcsnip::resolution::{module_candidates, ReferenceResolver};
use funcsnip::store::{GitCommandFetcher, RepositoryStore};
use funcsnip::types::LookupOutcome;

/// Exit code used when a lookup completes without finding anything.
const EXIT_NOT_FOUND: i32 = 2;

/// Locate a function's source text in a source tree.
#[derive(Parser)]
#[command(name = "funcsnip", version, about = "Locate a function's source text in a source tree")]
struct Cli {
    /// Directory holding the `.funcsnip` config (default: current directory)
    #[arg(short, long, global = true)]
    config_dir: Option<String>,

    /// Enabled languages, overriding the config (repeatable)
    #[arg(short = 'L', long = "language", global = true)]
    languages: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Target directory (default: current directory)
        path: Option<String>,
    },
    /// Find a function in a source tree
    Find {
        /// `function`, `package.module.function` or `path/to/module:function`
        reference: String,
        /// Source tree root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
        /// Output the match as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Find a function in a fetched job's tree
    Show {
        /// Job id returned by `fetch`
        job_id: String,
        /// Function reference
        reference: String,
        /// Output the match as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Clone a repository into a new job directory
    Fetch {
        /// Repository URL
        url: String,
    },
    /// Show how a reference is split
    Resolve {
        /// Function reference
        reference: String,
    },
    /// Resolve a dotted module locator to a file
    Module {
        /// Dotted module locator
        locator: String,
        /// Source tree root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_NOT_FOUND),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "funcsnip=debug" } else { "funcsnip=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs a command, returning `Ok(false)` when nothing was found.
fn run(cli: Cli) -> funcsnip::errors::Result<bool> {
    let config_dir = resolve_path(cli.config_dir);
    let mut config = load_config(&config_dir)?;
    if !cli.languages.is_empty() {
        config.languages = cli.languages;
    }

    match cli.command {
        Commands::Init { path } => {
            let target = resolve_path(path);
            save_config(&target, &LocatorConfig::default())?;
            println!("Wrote {}", get_config_path(&target).display());
            Ok(true)
        }
        Commands::Find {
            reference,
            root,
            json,
        } => {
            let locator = SourceLocator::new(config)?;
            let outcome = locator.locate(&resolve_path(root), &reference)?;
            Ok(print_outcome(&reference, outcome, json))
        }
        Commands::Show {
            job_id,
            reference,
            json,
        } => {
            let store = RepositoryStore::new(config)?;
            let outcome = store.locate(&job_id, &reference)?;
            Ok(print_outcome(&reference, outcome, json))
        }
        Commands::Fetch { url } => {
            let store = RepositoryStore::new(config)?;
            store.ensure_storage_root()?;
            let job_id = store.generate_job_id();
            if store.fetch(&GitCommandFetcher::new(), &url, &job_id)? {
                println!("{}", job_id);
                Ok(true)
            } else {
                eprintln!("Failed to fetch {}", url);
                Ok(false)
            }
        }
        Commands::Resolve { reference } => {
            let parsed = ReferenceResolver::resolve(&reference)?;
            println!(
                "module:   {}",
                parsed.module_locator.as_deref().unwrap_or("<none>")
            );
            println!("function: {}", parsed.function_name);
            Ok(true)
        }
        Commands::Module { locator, root } => {
            let source_locator = SourceLocator::new(config)?;
            let root = resolve_path(root);
            match source_locator.find_module_file(&root, &locator) {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(true)
                }
                None => {
                    println!("Module '{}' not found. Tried:", locator);
                    for candidate in module_candidates(&locator, source_locator.registry()).iter() {
                        println!("  {}", candidate.display());
                    }
                    Ok(false)
                }
            }
        }
    }
}

/// Prints a lookup outcome, returning whether a function was found.
fn print_outcome(reference: &str, outcome: LookupOutcome, json: bool) -> bool {
    match outcome {
        LookupOutcome::Found { path, matched } => {
            if json {
                let value = serde_json::json!({
                    "path": path.display().to_string(),
                    "start_line": matched.start_line,
                    "end_line": matched.end_line,
                    "source_text": matched.source_text,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&value).unwrap_or_default()
                );
            } else {
                print!("{}", matched.source_text);
            }
            true
        }
        LookupOutcome::ModuleNotFound { locator, .. } => {
            eprintln!("Module '{}' not found for '{}'", locator, reference);
            false
        }
        LookupOutcome::FunctionNotFound { .. } => {
            eprintln!("Function '{}' not found", reference);
            false
        }
    }
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
