//! Template rendering context.
//!
//! [`ContextBuilder`] merges the layers a page sees while rendering. Layers are
//! applied in a fixed order, later layers overriding earlier ones:
//!
//! 1. the current page marker ([`CURRENT_PAGE_KEY`])
//! 2. site-wide context
//! 3. caller-supplied overrides
//! 4. metadata extracted from the page header
//!
//! Metadata wins so that a page can shadow site defaults from its own header.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;
use serde_json::Value;

use crate::metadata::Metadata;
use crate::paths::PagePaths;

/// Context key holding the identity of the page being rendered.
pub const CURRENT_PAGE_KEY: &str = "__current_page__";

/// Key/value mapping handed to the template engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context(BTreeMap<String, Value>);

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy every entry of `other` into `self`, overriding existing keys.
    pub fn merge(&mut self, other: &Context) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Identity of the page being rendered, exposed under [`CURRENT_PAGE_KEY`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageIdentity {
    pub source_path: String,
    pub paths: PagePaths,
    pub is_html: bool,
    pub is_index: bool,
}

impl PageIdentity {
    fn to_value(&self) -> Value {
        serde_json::json!({
            "source_path": self.source_path,
            "link_url": self.paths.link_url,
            "final_url": self.paths.final_url,
            "build_path": self.paths.build_path,
            "is_html": self.is_html,
            "is_index": self.is_index,
        })
    }
}

/// Builds a [`Context`] from its layers.
///
/// Setter order does not matter; [`build`](Self::build) always applies the
/// layers in the documented precedence.
#[derive(Default)]
pub struct ContextBuilder<'a> {
    page: Option<&'a PageIdentity>,
    site: Option<&'a Context>,
    overrides: Option<&'a Context>,
    metadata: Option<&'a Metadata>,
}

impl<'a> ContextBuilder<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: &'a PageIdentity) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn site(mut self, site: &'a Context) -> Self {
        self.site = Some(site);
        self
    }

    #[must_use]
    pub fn overrides(mut self, overrides: &'a Context) -> Self {
        self.overrides = Some(overrides);
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: &'a Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Merge the layers into one context.
    #[must_use]
    pub fn build(self) -> Context {
        let mut context = Context::new();

        if let Some(page) = self.page {
            context.insert(CURRENT_PAGE_KEY, page.to_value());
        }
        if let Some(site) = self.site {
            context.merge(site);
        }
        if let Some(overrides) = self.overrides {
            context.merge(overrides);
        }
        if let Some(metadata) = self.metadata {
            for (key, value) in metadata {
                context.insert(key.clone(), value.clone());
            }
        }

        context
    }
}
