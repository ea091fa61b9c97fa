//! Pages, template contexts and site builds for Kiln.
//!
//! This crate provides:
//! - [`paths`]: mapping a source path to its link URL, final URL and output path
//! - [`metadata`]: `key: value` header extraction from page content
//! - [`Page`]: a single content file, rendered through a [`TemplateEngine`]
//! - [`ProjectSite`]: scanning a pages directory and building every page
//! - [`Plugin`]: hooks run before and after each page build
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use kiln_site::{JinjaEngine, ProjectSite, SiteConfig};
//!
//! let config = SiteConfig {
//!     prettify_urls: true,
//!     ..SiteConfig::with_root(Path::new("my-site"))
//! };
//! let site = ProjectSite::new(config);
//! let engine = JinjaEngine::with_templates_dir(Path::new("my-site/templates"));
//!
//! let report = site.build(&engine)?;
//! println!("{} pages written", report.written.len());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod memo;
pub mod metadata;
pub(crate) mod page;
pub mod paths;
pub(crate) mod plugin;
pub(crate) mod site;
pub mod store;
pub(crate) mod template;

pub use context::{CURRENT_PAGE_KEY, Context, ContextBuilder, PageIdentity};
pub use memo::Memo;
pub use metadata::Metadata;
pub use page::{BuildOutcome, Page, PageError, UrlResolvable};
pub use paths::PagePaths;
pub use plugin::{Plugin, PluginManager};
pub use site::{BuildReport, PageFailure, ProjectSite, Site, SiteConfig, SiteError};
pub use store::CaseInsensitiveStore;
pub use template::{JinjaEngine, TemplateEngine, TemplateError};
