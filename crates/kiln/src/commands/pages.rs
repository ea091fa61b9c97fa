//! `kiln pages` command implementation.

use std::path::PathBuf;

use clap::Args;
use kiln_config::{CliSettings, Config};
use kiln_site::{ProjectSite, Site, UrlResolvable};

use super::{prettify_override, site_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    /// Path to configuration file (default: auto-discover kiln.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit HTML pages as directory index files.
    #[arg(long)]
    prettify: bool,

    /// Keep HTML pages at their source paths.
    #[arg(long, conflicts_with = "prettify")]
    no_prettify: bool,
}

impl PagesArgs {
    /// Execute the pages command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the pages directory cannot
    /// be scanned.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            prettify_urls: prettify_override(self.prettify, self.no_prettify),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = ProjectSite::new(site_config(&config)?);

        let sources = site.scan_pages()?;
        for source in &sources {
            let mut page = site.page(source);
            let url = page.absolute_url(site.url())?;

            output.info(&format!("{} -> {url}", page.link_url()));
            if let Some(title) = page.metadata().get("title") {
                output.detail(&format!("    title: {title}"));
            }
            output.detail(&format!("    build: {}", page.build_path()));
        }

        output.success(&format!("{} pages", sources.len()));
        Ok(())
    }
}
