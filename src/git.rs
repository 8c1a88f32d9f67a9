//! Registry fetching via the system `git` command
//!
//! Each (url, ref) pair gets its own shallow clone under the cache root, named
//! by a stable hash of the pair. An existing clone is refreshed in place with
//! `git fetch` + `git checkout FETCH_HEAD`, so projects pointing at the same
//! registry and ref share one checkout. Every git invocation runs under a
//! hard timeout; nothing is retried.

use crate::{Config, Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

/// Progress callback for long-running operations
///
/// Called with:
/// - `message`: Description of current operation (e.g., "Cloning registry...")
/// - `current`: Current progress
/// - `total`: Total work; `current >= total` marks completion
pub type ProgressCallback = Arc<dyn Fn(&str, u64, u64) + Send + Sync>;

pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Stable cache directory name for a registry url + ref
pub fn registry_cache_key(url: &str, git_ref: &str) -> String {
    let digest = Sha256::digest(format!("{}\n{}", url, git_ref).as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Clones and refreshes registries inside a cache root
pub struct GitFetcher {
    git: String,
    cache_dir: PathBuf,
    clone_timeout: Duration,
    update_timeout: Duration,
    progress: Option<ProgressCallback>,
}

impl GitFetcher {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            git: "git".to_string(),
            cache_dir: cache_dir.as_ref().to_path_buf(),
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
            progress: None,
        }
    }

    /// Build a fetcher from user settings
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.cache_dir()?)
            .with_git(&config.fetch.git)
            .with_timeouts(
                Duration::from_secs(config.fetch.clone_timeout_seconds),
                Duration::from_secs(config.fetch.update_timeout_seconds),
            ))
    }

    pub fn with_git(mut self, git: &str) -> Self {
        self.git = git.to_string();
        self
    }

    pub fn with_timeouts(mut self, clone_timeout: Duration, update_timeout: Duration) -> Self {
        self.clone_timeout = clone_timeout;
        self.update_timeout = update_timeout;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Where the clone for (url, ref) lives
    pub fn repo_path(&self, url: &str, git_ref: &str) -> PathBuf {
        self.cache_dir.join(registry_cache_key(url, git_ref))
    }

    /// Clone or update the registry at url/ref; return the checkout root
    pub fn fetch(&self, url: &str, git_ref: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir)?;
        let repo_path = self.repo_path(url, git_ref);

        if repo_path.exists() {
            self.report(&format!("Updating registry {}@{}...", url, git_ref), 0);
            self.run(
                &["fetch", "origin", git_ref, "--depth", "1"],
                Some(&repo_path),
                self.update_timeout,
                "update",
            )?;
            self.run(
                &["checkout", "FETCH_HEAD"],
                Some(&repo_path),
                self.update_timeout,
                "update",
            )?;
        } else {
            self.report(&format!("Cloning registry {}@{}...", url, git_ref), 0);
            let target = repo_path.to_string_lossy();
            self.run(
                &["clone", "--depth", "1", "--branch", git_ref, url, target.as_ref()],
                None,
                self.clone_timeout,
                "clone",
            )?;
        }

        self.report(&format!("Registry {}@{} ready", url, git_ref), 100);
        Ok(repo_path)
    }

    fn report(&self, message: &str, current: u64) {
        if let Some(ref cb) = self.progress {
            cb(message, current, 100);
        }
    }

    fn run(&self, args: &[&str], cwd: Option<&Path>, timeout: Duration, action: &str) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async {
            let mut command = tokio::process::Command::new(&self.git);
            command
                .args(args)
                .env("GIT_TERMINAL_PROMPT", "0")
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);
            if let Some(dir) = cwd {
                command.current_dir(dir);
            }

            let child = command.spawn().map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::Fetch(format!("'{}' is not installed or not on PATH", self.git))
                } else {
                    Error::Fetch(format!("Failed to run {}: {}", self.git, e))
                }
            })?;

            let output = tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| {
                    Error::Fetch(format!(
                        "git {} timed out after {}s",
                        args[0],
                        timeout.as_secs()
                    ))
                })?
                .map_err(|e| Error::Fetch(format!("Failed to wait for git {}: {}", args[0], e)))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(Error::Fetch(format!(
                    "Failed to {} registry: {}",
                    action,
                    stderr.trim()
                )));
            }

            Ok::<(), Error>(())
        })
    }
}
