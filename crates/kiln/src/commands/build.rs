//! `kiln build` command implementation.

use std::path::PathBuf;

use clap::Args;
use kiln_config::{CliSettings, Config};
use kiln_site::{JinjaEngine, ProjectSite};

use super::{prettify_override, site_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover kiln.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    build_dir: Option<PathBuf>,

    /// Emit HTML pages as directory index files.
    #[arg(long)]
    prettify: bool,

    /// Keep HTML pages at their source paths.
    #[arg(long, conflicts_with = "prettify")]
    no_prettify: bool,

    /// Build pages in parallel.
    #[arg(long)]
    parallel: bool,

    /// Site base URL (overrides config).
    #[arg(long, env = "KILN_SITE_URL")]
    url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the pages directory cannot be
    /// scanned, or any page fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            build_dir: self.build_dir,
            prettify_urls: prettify_override(self.prettify, self.no_prettify),
            parallel: self.parallel.then_some(true),
            url: self.url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config = ?config.config_path, "Configuration loaded");
        let paths = &config.paths_resolved;

        output.info(&format!("Pages: {}", paths.pages_dir.display()));
        output.info(&format!("Output: {}", paths.build_dir.display()));

        let site = ProjectSite::new(site_config(&config)?);
        let engine = JinjaEngine::with_templates_dir(&paths.templates_dir);
        let report = site.build(&engine)?;

        for source in &report.discarded {
            output.detail(&format!("  discarded {source}"));
        }
        for failure in &report.failed {
            output.warning(&format!("  {}: {}", failure.source_path, failure.error));
        }

        if !report.is_success() {
            return Err(CliError::Build(format!(
                "{} of {} pages failed to build",
                report.failed.len(),
                report.total()
            )));
        }

        output.success(&format!(
            "Built {} pages to {}",
            report.written.len(),
            paths.build_dir.display()
        ));
        Ok(())
    }
}
