//! CLI command implementations.

mod build;
mod pages;

use kiln_config::Config;
use kiln_site::{Context, SiteConfig};
use serde_json::Value;

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use pages::PagesArgs;

/// Resolve a `--prettify` / `--no-prettify` flag pair into an override.
fn prettify_override(prettify: bool, no_prettify: bool) -> Option<bool> {
    if prettify {
        Some(true)
    } else if no_prettify {
        Some(false)
    } else {
        None
    }
}

/// Map loaded configuration into the site's settings.
fn site_config(config: &Config) -> Result<SiteConfig, CliError> {
    let paths = &config.paths_resolved;
    Ok(SiteConfig {
        project_dir: paths.project_dir.clone(),
        pages_dir: paths.pages_dir.clone(),
        build_dir: paths.build_dir.clone(),
        url: config.site.url.clone(),
        prettify_urls: config.site.prettify_urls,
        parallel: config.build.parallel,
        context: site_context(&config.context)?,
    })
}

/// Convert the `[context]` table into a template context.
fn site_context(table: &impl serde::Serialize) -> Result<Context, CliError> {
    match serde_json::to_value(table)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Ok(Context::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_prettify_override() {
        assert_eq!(prettify_override(true, false), Some(true));
        assert_eq!(prettify_override(false, true), Some(false));
        assert_eq!(prettify_override(false, false), None);
    }

    #[test]
    fn test_site_config_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("kiln.toml");
        fs::write(
            &config_path,
            r#"
[site]
url = "https://example.com/"
prettify_urls = true

[paths]
build_dir = "public"

[build]
parallel = true

[context]
title = "My site"
tags = ["a", "b"]

[context.author]
name = "Ada"
"#,
        )
        .unwrap();

        let config = Config::load(Some(config_path.as_path()), None).unwrap();
        let site = site_config(&config).unwrap();

        assert_eq!(site.pages_dir, temp_dir.path().join("pages"));
        assert_eq!(site.build_dir, temp_dir.path().join("public"));
        assert_eq!(site.url, "https://example.com/");
        assert!(site.prettify_urls);
        assert!(site.parallel);
        assert_eq!(site.context.get("title"), Some(&json!("My site")));
        assert_eq!(site.context.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(site.context.get("author"), Some(&json!({"name": "Ada"})));
    }
}
