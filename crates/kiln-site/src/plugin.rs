//! Page build hooks.
//!
//! A [`Plugin`] can rewrite a page's context and body right before rendering
//! and observe the page after its output was written. [`PluginManager`] holds
//! the registered plugins and runs each hook across all of them in
//! registration order.

use crate::context::Context;
use crate::page::Page;
use crate::site::Site;
use crate::store::CaseInsensitiveStore;

/// Hooks invoked around each page build.
///
/// Both hooks default to no-ops.
pub trait Plugin: Send + Sync {
    /// Called before rendering with the page's context and template body.
    ///
    /// Returns the (possibly rewritten) context and body. Call
    /// [`Page::discard`] to suppress writing the page.
    fn pre_build_page(
        &self,
        site: &dyn Site,
        page: &mut Page,
        context: Context,
        body: String,
    ) -> (Context, String) {
        let _ = (site, page);
        (context, body)
    }

    /// Called after the page's output file was written.
    fn post_build_page(&self, page: &Page) {
        let _ = page;
    }
}

/// Ordered collection of named plugins.
///
/// Names are case-insensitive. Registering a name that is already present
/// replaces that plugin and keeps its position in the run order.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<(String, Box<dyn Plugin>)>,
    positions: CaseInsensitiveStore<usize>,
}

impl PluginManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`, returning the plugin it replaced.
    pub fn register(
        &mut self,
        name: &str,
        plugin: impl Plugin + 'static,
    ) -> Option<Box<dyn Plugin>> {
        let entry = (name.to_owned(), Box::new(plugin) as Box<dyn Plugin>);
        if let Some(&position) = self.positions.get(name) {
            let previous = std::mem::replace(&mut self.plugins[position], entry);
            return Some(previous.1);
        }
        self.positions.insert(name, self.plugins.len());
        self.plugins.push(entry);
        None
    }

    /// Remove the plugin registered under `name`.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn Plugin>> {
        let position = self.positions.pop(name)?;
        let (_, plugin) = self.plugins.remove(position);
        for (index, (plugin_name, _)) in self.plugins.iter().enumerate().skip(position) {
            self.positions.insert(plugin_name, index);
        }
        Some(plugin)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Registered names in run order, as originally spelled.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin's pre-build hook, threading context and body through.
    pub fn pre_build_page(
        &self,
        site: &dyn Site,
        page: &mut Page,
        context: Context,
        body: String,
    ) -> (Context, String) {
        self.plugins
            .iter()
            .fold((context, body), |(context, body), (_, plugin)| {
                plugin.pre_build_page(site, page, context, body)
            })
    }

    /// Run every plugin's post-build hook.
    pub fn post_build_page(&self, page: &Page) {
        for (_, plugin) in &self.plugins {
            plugin.post_build_page(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::site::{ProjectSite, SiteConfig};

    struct Append(&'static str);

    impl Plugin for Append {
        fn pre_build_page(
            &self,
            _site: &dyn Site,
            _page: &mut Page,
            mut context: Context,
            body: String,
        ) -> (Context, String) {
            context.insert("last", self.0);
            (context, format!("{body}{}", self.0))
        }
    }

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Plugin for Recorder {
        fn post_build_page(&self, page: &Page) {
            self.0.lock().unwrap().push(page.source_path().to_owned());
        }
    }

    fn site_with_page(content: &str) -> (tempfile::TempDir, ProjectSite) {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("pages")).unwrap();
        std::fs::write(temp_dir.path().join("pages/a.html"), content).unwrap();
        let site = ProjectSite::new(SiteConfig::with_root(temp_dir.path()));
        (temp_dir, site)
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let (_dir, site) = site_with_page("body");
        let mut manager = PluginManager::new();
        manager.register("first", Append("-1"));
        manager.register("second", Append("-2"));

        let mut page = site.page("a.html");
        let (context, body) =
            manager.pre_build_page(&site, &mut page, Context::new(), "body".to_owned());

        assert_eq!(body, "body-1-2");
        assert_eq!(context.get("last"), Some(&json!("-2")));
    }

    #[test]
    fn test_register_same_name_case_insensitive_replaces_in_place() {
        let mut manager = PluginManager::new();
        assert!(manager.register("Drafts", Append("a")).is_none());
        manager.register("other", Append("b"));
        assert!(manager.register("DRAFTS", Append("c")).is_some());

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.names().collect::<Vec<_>>(), vec!["DRAFTS", "other"]);
        assert!(manager.contains("drafts"));
    }

    #[test]
    fn test_unregister_reindexes_later_plugins() {
        let mut manager = PluginManager::new();
        manager.register("a", Append("a"));
        manager.register("b", Append("b"));
        manager.register("c", Append("c"));

        assert!(manager.unregister("A").is_some());
        assert!(manager.unregister("a").is_none());
        // "c" must still be addressable after the shift
        assert!(manager.register("C", Append("z")).is_some());
        assert_eq!(manager.names().collect::<Vec<_>>(), vec!["b", "C"]);
    }

    #[test]
    fn test_post_build_page_reaches_all_plugins() {
        let (_dir, site) = site_with_page("x");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut manager = PluginManager::new();
        manager.register("one", Recorder(Arc::clone(&seen)));
        manager.register("two", Recorder(Arc::clone(&seen)));

        let page = site.page("a.html");
        manager.post_build_page(&page);

        assert_eq!(*seen.lock().unwrap(), vec!["a.html", "a.html"]);
    }

    #[test]
    fn test_empty_manager_passes_through() {
        let (_dir, site) = site_with_page("x");
        let manager = PluginManager::new();
        let mut page = site.page("a.html");

        let (context, body) =
            manager.pre_build_page(&site, &mut page, Context::new(), "unchanged".to_owned());

        assert!(context.is_empty());
        assert_eq!(body, "unchanged");
    }
}
