use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{error, info};
use uuid::Uuid;

use crate::config::LocatorConfig;
use crate::errors::{LocateError, Result};
use crate::locator::SourceLocator;
use crate::types::LookupOutcome;

/// Materializes a repository at a local path.
pub trait RepositoryFetcher: Send + Sync {
    /// Fetches `url` into `dest`, returning `true` on success.
    fn fetch(&self, url: &str, dest: &Path) -> bool;
}

/// Fetches repositories by running `git clone`.
#[derive(Debug, Clone)]
pub struct GitCommandFetcher {
    program: String,
}

impl GitCommandFetcher {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Uses a different `git` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCommandFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryFetcher for GitCommandFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> bool {
        let output = Command::new(&self.program)
            .arg("clone")
            .arg("--quiet")
            .arg("--")
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output();
        match output {
            Ok(out) if out.status.success() => true,
            Ok(out) => {
                error!(
                    "Failed to clone repository {}: {}",
                    url,
                    String::from_utf8_lossy(&out.stderr).trim()
                );
                false
            }
            Err(e) => {
                error!("Failed to run {}: {}", self.program, e);
                false
            }
        }
    }
}

/// Job-scoped source trees under a single storage root.
///
/// Each job's tree lives at `<storage_root>/<job_id>`. The storage root is
/// created by [`ensure_storage_root`](Self::ensure_storage_root), never
/// implicitly.
pub struct RepositoryStore {
    storage_root: PathBuf,
    locator: SourceLocator,
}

impl RepositoryStore {
    /// Creates a store rooted at `config.storage_path`.
    pub fn new(config: LocatorConfig) -> Result<Self> {
        let storage_root = PathBuf::from(&config.storage_path);
        Ok(Self {
            storage_root,
            locator: SourceLocator::new(config)?,
        })
    }

    /// Creates the storage root directory if it does not exist.
    pub fn ensure_storage_root(&self) -> Result<()> {
        fs::create_dir_all(&self.storage_root)?;
        Ok(())
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    /// Returns a fresh random job id.
    pub fn generate_job_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Returns the tree path for `job_id`.
    ///
    /// Ids that are empty, contain a path separator, or are `.`/`..` are
    /// rejected so a job can never address a path outside the storage root.
    pub fn repo_path(&self, job_id: &str) -> Result<PathBuf> {
        let invalid = job_id.is_empty()
            || job_id == "."
            || job_id == ".."
            || job_id.contains(['/', '\\']);
        if invalid {
            return Err(LocateError::InvalidJobId {
                job_id: job_id.to_string(),
            });
        }
        Ok(self.storage_root.join(job_id))
    }

    /// Fetches `url` into the tree for `job_id`.
    pub fn fetch(&self, fetcher: &dyn RepositoryFetcher, url: &str, job_id: &str) -> Result<bool> {
        let dest = self.repo_path(job_id)?;
        info!("Fetching {} into {}", url, dest.display());
        Ok(fetcher.fetch(url, &dest))
    }

    /// Looks up `reference` in the tree for `job_id`.
    pub fn locate(&self, job_id: &str, reference: &str) -> Result<LookupOutcome> {
        let root = self.repo_path(job_id)?;
        self.locator.locate(&root, reference)
    }

    /// Returns the source text of `reference` in the tree for `job_id`.
    pub fn get_function_code(&self, job_id: &str, reference: &str) -> Result<Option<String>> {
        let root = self.repo_path(job_id)?;
        self.locator.get_function_code(&root, reference)
    }
}
