//! Per-page build pipeline.
//!
//! A [`Page`] wraps one content file. On construction it derives its output
//! locations and loads its content; [`Page::render`] runs metadata extraction,
//! context building, the site's pre-build hooks, and the template engine;
//! [`Page::build`] writes the result under the site's build root.
//!
//! Pages are `Send` but not `Sync`: one worker owns a page for its whole
//! lifetime.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use url::Url;

use crate::context::{Context, ContextBuilder, PageIdentity};
use crate::memo::Memo;
use crate::metadata::{self, DEFAULT_SPLIT_CHAR, Metadata};
use crate::paths::{self, PagePaths};
use crate::site::Site;
use crate::template::{TemplateEngine, TemplateError};

/// Error returned when building a page fails.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The template engine rejected the page body.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Writing the output failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The site base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// What [`Page::build`] did with the rendered output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Output written to the contained path.
    Written(PathBuf),
    /// A plugin discarded the page; nothing was written.
    Discarded,
}

/// Resolve `final_url` against `base` with URL-join semantics.
///
/// An empty base leaves `final_url` unchanged.
fn join_url(base: &str, final_url: &str) -> Result<String, url::ParseError> {
    if base.is_empty() {
        return Ok(final_url.to_owned());
    }
    Ok(Url::parse(base)?.join(final_url)?.into())
}

/// Access to a resource's derived URLs.
pub trait UrlResolvable {
    /// URL other pages use to link to this resource.
    fn link_url(&self) -> &str;

    /// URL the resource is served at after the build.
    fn final_url(&self) -> &str;

    /// `final_url` resolved against the site base URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `base` is neither empty nor an absolute
    /// URL.
    fn absolute_final_url(&self, base: &str) -> Result<String, url::ParseError> {
        join_url(base, self.final_url())
    }
}

/// One source content file and its build state.
#[derive(Debug)]
pub struct Page {
    source_path: String,
    prettify: bool,
    paths: PagePaths,
    full_source_path: PathBuf,
    full_build_path: PathBuf,
    content: Option<String>,
    metadata: Option<Metadata>,
    discarded: bool,
    absolute_urls: Memo<String, Result<String, url::ParseError>>,
}

impl Page {
    /// Create a page for `source_path` (relative to the site's pages
    /// directory) and load its content.
    ///
    /// Unreadable content is logged and treated as empty.
    pub fn new(site: &dyn Site, source_path: impl Into<String>) -> Self {
        let source_path = source_path.into();
        let prettify = site.prettify_urls();
        let paths = paths::resolve(&source_path, prettify);
        let full_source_path = site.pages_path().join(&source_path);
        let full_build_path = site.build_path().join(&paths.build_path);

        let mut page = Self {
            source_path,
            prettify,
            paths,
            full_source_path,
            full_build_path,
            content: None,
            metadata: None,
            discarded: false,
            absolute_urls: Memo::new(),
        };
        page.load();
        page
    }

    /// Source path relative to the pages directory.
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Whether URLs were prettified for this page.
    pub fn prettify(&self) -> bool {
        self.prettify
    }

    /// Link URL, final URL and build path.
    pub fn paths(&self) -> &PagePaths {
        &self.paths
    }

    /// Output location relative to the build root.
    pub fn build_path(&self) -> &str {
        &self.paths.build_path
    }

    /// Absolute path of the source file.
    pub fn full_source_path(&self) -> &Path {
        &self.full_source_path
    }

    /// Absolute path of the output file.
    pub fn full_build_path(&self) -> &Path {
        &self.full_build_path
    }

    /// Whether the source path ends with `.html`.
    pub fn is_html(&self) -> bool {
        paths::is_html(&self.source_path)
    }

    /// Whether the source path ends with `index.html`.
    pub fn is_index(&self) -> bool {
        paths::is_index(&self.source_path)
    }

    /// Current page body, loading it if it was invalidated.
    ///
    /// After [`metadata`](Self::metadata) ran, the header lines are gone.
    pub fn data(&mut self) -> &str {
        if self.content.is_none() {
            self.load();
        }
        self.content.as_deref().unwrap_or_default()
    }

    /// Drop the loaded content and extracted metadata; the next access
    /// rereads the source file.
    pub fn invalidate(&mut self) {
        self.content = None;
        self.metadata = None;
        self.absolute_urls.clear();
    }

    fn load(&mut self) {
        self.content = Some(read_content(&self.full_source_path));
    }

    /// Metadata header of the page, split on `:`.
    ///
    /// The first call strips the header from the body; later calls return
    /// the cached mapping.
    pub fn metadata(&mut self) -> &Metadata {
        self.metadata_with(DEFAULT_SPLIT_CHAR)
    }

    /// Metadata header of the page, split on `split_char`.
    ///
    /// Only the first call's split character takes effect. Pages that are
    /// not HTML never have metadata.
    pub fn metadata_with(&mut self, split_char: char) -> &Metadata {
        if self.metadata.is_none() {
            let metadata = if self.is_html() {
                let extracted = metadata::extract(self.data(), split_char);
                self.content = Some(extracted.body);
                extracted.metadata
            } else {
                Metadata::new()
            };
            self.metadata = Some(metadata);
        }
        self.metadata.get_or_insert_default()
    }

    /// Identity exposed to templates as the current page.
    pub fn identity(&self) -> PageIdentity {
        PageIdentity {
            source_path: self.source_path.clone(),
            paths: self.paths.clone(),
            is_html: self.is_html(),
            is_index: self.is_index(),
        }
    }

    /// Build the rendering context: page marker, site context, `extra`, and
    /// the page's metadata, in increasing precedence.
    pub fn context(&mut self, site: &dyn Site, extra: Option<&Context>) -> Context {
        let identity = self.identity();
        let site_context = site.context();
        let metadata = self.metadata();

        let mut builder = ContextBuilder::new()
            .page(&identity)
            .site(&site_context)
            .metadata(metadata);
        if let Some(extra) = extra {
            builder = builder.overrides(extra);
        }
        builder.build()
    }

    /// Mark the page so [`build`](Self::build) skips writing it.
    pub fn discard(&mut self) {
        self.discarded = true;
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    /// Render the page body through the site's hooks and `engine`.
    ///
    /// The pre-build hooks may rewrite the body; the rewritten body replaces
    /// the page's content before rendering, so it sticks even if the engine
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Template` if the engine rejects the body.
    pub fn render(
        &mut self,
        site: &dyn Site,
        engine: &dyn TemplateEngine,
    ) -> Result<String, PageError> {
        let context = self.context(site, None);
        let body = self.data().to_owned();

        let (context, body) = site.plugins().pre_build_page(site, self, context, body);
        let body = self.content.insert(body);

        Ok(engine.render(body, &context)?)
    }

    /// Render the page and write it to its build path.
    ///
    /// Hooks run even for pages that end up discarded.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Template` on render failures and `PageError::Io`
    /// when the output cannot be written.
    pub fn build(
        &mut self,
        site: &dyn Site,
        engine: &dyn TemplateEngine,
    ) -> Result<BuildOutcome, PageError> {
        tracing::debug!(source = %self.source_path, url = %self.paths.final_url, "Building page");
        let rendered = self.render(site, engine)?;

        if self.discarded {
            tracing::debug!(source = %self.source_path, "Page discarded");
            return Ok(BuildOutcome::Discarded);
        }

        if let Some(parent) = self.full_build_path.parent() {
            ensure_dir(parent).map_err(|source| PageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.full_build_path, rendered.as_bytes()).map_err(|source| PageError::Io {
            path: self.full_build_path.clone(),
            source,
        })?;

        site.plugins().post_build_page(self);
        Ok(BuildOutcome::Written(self.full_build_path.clone()))
    }

    /// `final_url` resolved against the site base URL, memoized per base.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Url` if `base` is not an absolute URL.
    pub fn absolute_url(&self, base: &str) -> Result<String, PageError> {
        Ok(self.absolute_final_url(base)?)
    }
}

impl UrlResolvable for Page {
    fn link_url(&self) -> &str {
        &self.paths.link_url
    }

    fn final_url(&self) -> &str {
        &self.paths.final_url
    }

    fn absolute_final_url(&self, base: &str) -> Result<String, url::ParseError> {
        self.absolute_urls
            .get_or_insert_with(base.to_owned(), |base| {
                join_url(base, &self.paths.final_url)
            })
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Page: {}>", self.source_path)
    }
}

/// Read a source file as UTF-8, normalizing `\r\n` and lone `\r` to `\n`.
///
/// Read and decode failures are logged and yield an empty string.
fn read_content(path: &Path) -> String {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Page file could not be read");
            return String::new();
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) if text.contains('\r') => text.replace("\r\n", "\n").replace('\r', "\n"),
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Page file is not valid UTF-8");
            String::new()
        }
    }
}

/// Create `dir` and its parents; a directory that already exists, including
/// one created concurrently by another page, is fine.
fn ensure_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir_all(dir) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        result => result,
    }
}
