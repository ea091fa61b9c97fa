//! Output URL and build location derivation.
//!
//! A page's source path (relative to the pages directory, forward slashes)
//! determines three values:
//!
//! - `link_url`: `/` + source path, the URL other pages use to reference it
//! - `final_url`: the URL the page is served at after the build
//! - `build_path`: where the rendered file lands, relative to the build root
//!
//! With prettification enabled, HTML pages are emitted as directory index
//! files so their served URL carries no extension:
//!
//! | Source | `final_url` | `build_path` |
//! |--------|-------------|--------------|
//! | `index.html` | `/` | `index.html` |
//! | `blog/post.html` | `/blog/post/` | `blog/post/index.html` |
//! | `blog/index.html` | `/blog/` | `blog/index.html` |
//! | `feed.xml` | `/feed.xml` | `feed.xml` |

use serde::Serialize;

const HTML_SUFFIX: &str = ".html";
const INDEX_FILE: &str = "index.html";

/// Derived locations of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PagePaths {
    /// Canonical reference URL (`/` + source path).
    pub link_url: String,
    /// URL the page is served at in the built site.
    pub final_url: String,
    /// Output location relative to the build root.
    pub build_path: String,
}

/// Whether the source path names an HTML page.
///
/// Suffix match only: `a.html/b.txt` is not HTML.
#[must_use]
pub fn is_html(source_path: &str) -> bool {
    source_path.ends_with(HTML_SUFFIX)
}

/// Whether the source path names a directory index file.
#[must_use]
pub fn is_index(source_path: &str) -> bool {
    source_path.ends_with(INDEX_FILE)
}

/// Derive link URL, final URL, and build path for a source path.
#[must_use]
pub fn resolve(source_path: &str, prettify: bool) -> PagePaths {
    let link_url = format!("/{source_path}");

    if !prettify || !is_html(source_path) {
        return PagePaths {
            final_url: link_url.clone(),
            link_url,
            build_path: source_path.to_owned(),
        };
    }

    if is_index(source_path) {
        let final_url = strip_last(&link_url, INDEX_FILE).to_owned();
        return PagePaths {
            link_url,
            final_url,
            build_path: source_path.to_owned(),
        };
    }

    let final_url = format!("{}/", strip_last(&link_url, HTML_SUFFIX));
    let build_path = format!("{}/{INDEX_FILE}", strip_last(source_path, HTML_SUFFIX));
    PagePaths {
        link_url,
        final_url,
        build_path,
    }
}

/// Everything before the last occurrence of `pattern`.
fn strip_last<'a>(value: &'a str, pattern: &str) -> &'a str {
    value.rsplit_once(pattern).map_or(value, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn paths(link_url: &str, final_url: &str, build_path: &str) -> PagePaths {
        PagePaths {
            link_url: link_url.to_owned(),
            final_url: final_url.to_owned(),
            build_path: build_path.to_owned(),
        }
    }

    #[test]
    fn test_prettify_regular_page() {
        assert_eq!(
            resolve("blog/post.html", true),
            paths("/blog/post.html", "/blog/post/", "blog/post/index.html")
        );
    }

    #[test]
    fn test_prettify_root_index() {
        assert_eq!(
            resolve("index.html", true),
            paths("/index.html", "/", "index.html")
        );
    }

    #[test]
    fn test_prettify_nested_index() {
        assert_eq!(
            resolve("docs/guide/index.html", true),
            paths("/docs/guide/index.html", "/docs/guide/", "docs/guide/index.html")
        );
    }

    #[test]
    fn test_prettify_top_level_page() {
        assert_eq!(
            resolve("about.html", true),
            paths("/about.html", "/about/", "about/index.html")
        );
    }

    #[test]
    fn test_no_prettify_keeps_source_layout() {
        for source in ["index.html", "blog/post.html", "robots.txt", "a/index.html"] {
            let resolved = resolve(source, false);
            assert_eq!(resolved.link_url, format!("/{source}"));
            assert_eq!(resolved.final_url, resolved.link_url);
            assert_eq!(resolved.build_path, source);
        }
    }

    #[test]
    fn test_non_html_never_prettified() {
        for source in ["robots.txt", "feed.xml", "data/items.json", "page.htm"] {
            for prettify in [true, false] {
                let resolved = resolve(source, prettify);
                assert_eq!(resolved.link_url, format!("/{source}"));
                assert_eq!(resolved.final_url, resolved.link_url);
                assert_eq!(resolved.build_path, source);
            }
        }
    }

    #[test]
    fn test_html_mid_path_is_not_html() {
        assert!(!is_html("archive.html/notes.txt"));
        assert_eq!(
            resolve("archive.html/notes.txt", true),
            paths(
                "/archive.html/notes.txt",
                "/archive.html/notes.txt",
                "archive.html/notes.txt"
            )
        );
    }

    #[test]
    fn test_prettified_non_index_builds_to_directory_index() {
        for source in ["a.html", "x/y/z.html", "post.html.html", "notindex.html.html"] {
            let resolved = resolve(source, true);
            assert!(resolved.build_path.ends_with("/index.html"), "{source}");
            assert!(resolved.final_url.ends_with('/'), "{source}");
        }
    }

    #[test]
    fn test_repeated_suffix_strips_only_last() {
        assert_eq!(
            resolve("post.html.html", true),
            paths("/post.html.html", "/post.html/", "post.html/index.html")
        );
    }

    #[test]
    fn test_index_suffix_without_separator() {
        // "myindex.html" ends with "index.html" and is classified as an index file
        assert!(is_index("myindex.html"));
        assert_eq!(
            resolve("blog/myindex.html", true),
            paths("/blog/myindex.html", "/blog/my", "blog/myindex.html")
        );
    }

    #[test]
    fn test_classification() {
        assert!(is_html("index.html"));
        assert!(is_index("index.html"));
        assert!(is_html("blog/post.html"));
        assert!(!is_index("blog/post.html"));
        assert!(!is_html("style.css"));
        assert!(!is_index("style.css"));
    }
}
