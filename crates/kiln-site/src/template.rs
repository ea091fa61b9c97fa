//! Template engine abstraction.
//!
//! Pages hand their body and [`Context`] to a [`TemplateEngine`]; the engine
//! owns the template syntax. [`JinjaEngine`] is the `minijinja`-backed
//! implementation used by the CLI.

use std::path::Path;

use minijinja::Environment;

use crate::context::Context;

/// Error returned when a template fails to compile or render.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Syntax or evaluation error from `minijinja`.
    #[error("Template error: {0}")]
    Jinja(#[from] minijinja::Error),
    /// Error reported by another engine implementation.
    #[error("Template error: {0}")]
    Engine(String),
}

/// Renders a template source string against a context.
pub trait TemplateEngine: Send + Sync {
    /// Render `source` with `context`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` for malformed templates or evaluation failures.
    fn render(&self, source: &str, context: &Context) -> Result<String, TemplateError>;
}

/// `minijinja` template engine.
///
/// When created with [`with_templates_dir`](Self::with_templates_dir), pages
/// can `{% extends %}` and `{% include %}` templates from that directory.
pub struct JinjaEngine {
    env: Environment<'static>,
}

impl JinjaEngine {
    /// Create an engine without a template loader.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        Self { env }
    }

    /// Create an engine that resolves named templates from `dir`.
    #[must_use]
    pub fn with_templates_dir(dir: &Path) -> Self {
        let mut engine = Self::new();
        engine.env.set_loader(minijinja::path_loader(dir));
        engine
    }
}

impl Default for JinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for JinjaEngine {
    fn render(&self, source: &str, context: &Context) -> Result<String, TemplateError> {
        Ok(self.env.render_str(source, context)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn context(pairs: &[(&str, serde_json::Value)]) -> Context {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_render_variables() {
        let engine = JinjaEngine::new();
        let ctx = context(&[("name", json!("World"))]);
        let html = engine.render("<p>Hello {{ name }}</p>", &ctx).unwrap();
        assert_eq!(html, "<p>Hello World</p>");
    }

    #[test]
    fn test_render_control_flow() {
        let engine = JinjaEngine::new();
        let ctx = context(&[("items", json!(["a", "b"]))]);
        let html = engine
            .render("{% for i in items %}[{{ i }}]{% endfor %}", &ctx)
            .unwrap();
        assert_eq!(html, "[a][b]");
    }

    #[test]
    fn test_render_undefined_variable_is_empty() {
        let engine = JinjaEngine::new();
        let html = engine.render("a{{ missing }}b", &Context::new()).unwrap();
        assert_eq!(html, "ab");
    }

    #[test]
    fn test_render_syntax_error() {
        let engine = JinjaEngine::new();
        let result = engine.render("{% if %}", &Context::new());
        assert!(matches!(result, Err(TemplateError::Jinja(_))));
    }

    #[test]
    fn test_render_extends_from_templates_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("base.html"),
            "<title>{{ title }}</title>{% block body %}{% endblock %}",
        )
        .unwrap();

        let engine = JinjaEngine::with_templates_dir(temp_dir.path());
        let ctx = context(&[("title", json!("Home"))]);
        let html = engine
            .render(
                "{% extends \"base.html\" %}{% block body %}<p>hi</p>{% endblock %}",
                &ctx,
            )
            .unwrap();

        assert_eq!(html, "<title>Home</title><p>hi</p>");
    }
}
