//! Site-wide state and the build driver.
//!
//! [`Site`] is what a [`Page`] needs from its surroundings: project and
//! output roots, the prettify flag, the base URL, the site-wide context, and
//! the plugin hooks. [`ProjectSite`] implements it for a project on disk and
//! drives a full build over every file in the pages directory.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use kiln_site::{JinjaEngine, ProjectSite, SiteConfig};
//!
//! let site = ProjectSite::new(SiteConfig::with_root(Path::new("my-site")));
//! let engine = JinjaEngine::with_templates_dir(Path::new("my-site/templates"));
//! let report = site.build(&engine)?;
//! assert!(report.is_success());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::context::Context;
use crate::page::{BuildOutcome, Page, PageError};
use crate::plugin::{Plugin, PluginManager};
use crate::template::TemplateEngine;

/// Surroundings of a page build.
pub trait Site {
    /// Project root.
    fn path(&self) -> &Path;

    /// Directory holding the source content files.
    fn pages_path(&self) -> PathBuf {
        self.path().join("pages")
    }

    /// Output root.
    fn build_path(&self) -> &Path;

    /// Whether HTML pages are emitted as directory index files.
    fn prettify_urls(&self) -> bool;

    /// Base URL for absolute page URLs (may be empty).
    fn url(&self) -> &str;

    /// Site-wide template context.
    fn context(&self) -> Context;

    /// Build hooks.
    fn plugins(&self) -> &PluginManager;
}

/// Configuration for [`ProjectSite`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Project root.
    pub project_dir: PathBuf,
    /// Source content directory.
    pub pages_dir: PathBuf,
    /// Output directory.
    pub build_dir: PathBuf,
    /// Base URL for absolute page URLs.
    pub url: String,
    /// Emit HTML pages as directory index files.
    pub prettify_urls: bool,
    /// Build pages on the rayon thread pool.
    pub parallel: bool,
    /// Site-wide template context.
    pub context: Context,
}

impl SiteConfig {
    /// Default layout under `root`: `pages/` in, `.build/` out.
    #[must_use]
    pub fn with_root(root: &Path) -> Self {
        Self {
            project_dir: root.to_path_buf(),
            pages_dir: root.join("pages"),
            build_dir: root.join(".build"),
            url: String::new(),
            prettify_urls: false,
            parallel: false,
            context: Context::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_root(Path::new("."))
    }
}

/// Error returned when the site cannot be scanned.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The pages directory does not exist.
    #[error("Pages directory not found: {}", .0.display())]
    PagesDirNotFound(PathBuf),
    /// Reading a directory under the pages directory failed.
    #[error("Failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A page that failed to build.
#[derive(Debug)]
pub struct PageFailure {
    pub source_path: String,
    pub error: PageError,
}

/// Outcome of a full site build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output files written.
    pub written: Vec<PathBuf>,
    /// Source paths of pages discarded by plugins.
    pub discarded: Vec<String>,
    /// Pages whose build failed.
    pub failed: Vec<PageFailure>,
}

impl BuildReport {
    fn record(&mut self, source_path: String, result: Result<BuildOutcome, PageError>) {
        match result {
            Ok(BuildOutcome::Written(path)) => self.written.push(path),
            Ok(BuildOutcome::Discarded) => self.discarded.push(source_path),
            Err(error) => {
                tracing::error!(source = %source_path, error = %error, "Page build failed");
                self.failed.push(PageFailure { source_path, error });
            }
        }
    }

    /// True when no page failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of pages processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.discarded.len() + self.failed.len()
    }
}

/// A site rooted in a project directory.
pub struct ProjectSite {
    config: SiteConfig,
    plugins: PluginManager,
}

impl ProjectSite {
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            plugins: PluginManager::new(),
        }
    }

    /// Replace the site-wide context.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.config.context = context;
        self
    }

    /// Register a plugin.
    #[must_use]
    pub fn with_plugin(mut self, name: &str, plugin: impl Plugin + 'static) -> Self {
        self.plugins.register(name, plugin);
        self
    }

    pub fn plugins_mut(&mut self) -> &mut PluginManager {
        &mut self.plugins
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Construct the page for `source_path`.
    pub fn page(&self, source_path: &str) -> Page {
        Page::new(self, source_path)
    }

    /// Source paths of every file under the pages directory, sorted.
    ///
    /// Hidden files and directories are skipped. Paths use `/` separators.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::PagesDirNotFound` if the pages directory is
    /// missing and `SiteError::Scan` if a directory cannot be read.
    pub fn scan_pages(&self) -> Result<Vec<String>, SiteError> {
        let pages_dir = &self.config.pages_dir;
        if !pages_dir.is_dir() {
            return Err(SiteError::PagesDirNotFound(pages_dir.clone()));
        }

        let mut sources = Vec::new();
        collect_sources(pages_dir, "", &mut sources)?;
        sources.sort();
        tracing::debug!(count = sources.len(), "Pages scan completed");
        Ok(sources)
    }

    /// Build every page, continuing past pages that fail.
    ///
    /// # Errors
    ///
    /// Returns `SiteError` if the pages directory cannot be scanned. Per-page
    /// failures are collected in the report instead.
    pub fn build(&self, engine: &dyn TemplateEngine) -> Result<BuildReport, SiteError> {
        let sources = self.scan_pages()?;
        tracing::info!(
            pages = sources.len(),
            parallel = self.config.parallel,
            "Building site"
        );

        let build_one = |source: &String| {
            let mut page = self.page(source);
            let result = page.build(self, engine);
            (source.clone(), result)
        };
        let results: Vec<_> = if self.config.parallel {
            sources.par_iter().map(build_one).collect()
        } else {
            sources.iter().map(build_one).collect()
        };

        let mut report = BuildReport::default();
        for (source, result) in results {
            report.record(source, result);
        }

        tracing::info!(
            written = report.written.len(),
            discarded = report.discarded.len(),
            failed = report.failed.len(),
            "Site build finished"
        );
        Ok(report)
    }
}

impl Site for ProjectSite {
    fn path(&self) -> &Path {
        &self.config.project_dir
    }

    fn pages_path(&self) -> PathBuf {
        self.config.pages_dir.clone()
    }

    fn build_path(&self) -> &Path {
        &self.config.build_dir
    }

    fn prettify_urls(&self) -> bool {
        self.config.prettify_urls
    }

    fn url(&self) -> &str {
        &self.config.url
    }

    fn context(&self) -> Context {
        self.config.context.clone()
    }

    fn plugins(&self) -> &PluginManager {
        &self.plugins
    }
}

/// Recursively collect file paths under `dir`, relative to the pages root.
fn collect_sources(dir: &Path, prefix: &str, sources: &mut Vec<String>) -> Result<(), SiteError> {
    let scan_error = |source| SiteError::Scan {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let source_path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        let file_type = entry.file_type().map_err(scan_error)?;
        if file_type.is_dir() {
            collect_sources(&entry.path(), &source_path, sources)?;
        } else if file_type.is_file() {
            sources.push(source_path);
        }
    }
    Ok(())
}
