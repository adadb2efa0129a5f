//! Template service trait and the minijinja-backed default.

use std::fs;

use minijinja::Environment;
use serde_json::Value;

use crate::error::Error;

/// Renders a named template with structured data.
pub trait TemplateService: Send + Sync {
    fn render(&self, name: &str, data: &Value) -> Result<String, Error>;
}

/// Templates loaded from disk and rendered with minijinja.
///
/// Templates are registered under their file name. Output of templates
/// named `*.html`, `*.htm` or `*.xml` is HTML-escaped.
#[derive(Debug)]
pub struct HtmlTemplates {
    env: Environment<'static>,
}

impl HtmlTemplates {
    /// An empty set of templates with the standard filters, tests and
    /// name-based auto-escaping.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Register every file matching `pattern`. Returns how many were added.
    pub fn load_glob(&mut self, pattern: &str) -> Result<usize, Error> {
        let mut count = 0;
        for entry in glob::glob(pattern)? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path)?;
            self.add_template(name, source)?;
            count += 1;
        }
        if count == 0 {
            return Err(Error::EmptyGlob(pattern.to_string()));
        }
        Ok(count)
    }

    pub fn add_template(&mut self, name: &str, source: impl Into<String>) -> Result<(), Error> {
        self.env.add_template_owned(name.to_string(), source.into())?;
        Ok(())
    }

    /// The underlying environment, for registering functions and filters.
    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for HtmlTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateService for HtmlTemplates {
    fn render(&self, name: &str, data: &Value) -> Result<String, Error> {
        let template = self.env.get_template(name)?;
        Ok(template.render(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_escapes_html() {
        let mut templates = HtmlTemplates::new();
        templates
            .add_template("greet.html", "<p>Hi {{ name }}</p>")
            .unwrap();

        let out = templates
            .render("greet.html", &json!({ "name": "<b>geek</b>" }))
            .unwrap();
        assert_eq!(out, "<p>Hi &lt;b&gt;geek&lt;&#x2f;b&gt;</p>");
    }

    #[test]
    fn test_builtin_filters_available() {
        let mut templates = HtmlTemplates::default();
        templates
            .add_template("list.html", "{{ name|upper }}: {{ items|join(\", \") }}")
            .unwrap();

        let out = templates
            .render("list.html", &json!({ "name": "<i>", "items": ["a", "b"] }))
            .unwrap();
        assert_eq!(out, "&lt;I&gt;: a, b");
    }

    #[test]
    fn test_plain_text_not_escaped() {
        let mut templates = HtmlTemplates::new();
        templates.add_template("note.txt", "{{ body }}").unwrap();

        let out = templates.render("note.txt", &json!({ "body": "a < b" })).unwrap();
        assert_eq!(out, "a < b");
    }

    #[test]
    fn test_custom_function() {
        let mut templates = HtmlTemplates::new();
        templates
            .env_mut()
            .add_function("shout", |s: String| s.to_uppercase());
        templates.add_template("a.txt", "{{ shout(word) }}").unwrap();

        let out = templates.render("a.txt", &json!({ "word": "hey" })).unwrap();
        assert_eq!(out, "HEY");
    }

    #[test]
    fn test_missing_template() {
        let templates = HtmlTemplates::new();
        let err = templates.render("nope.html", &Value::Null).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_load_glob() {
        let dir = std::env::temp_dir().join(format!("weft-templates-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), "<h1>{{ title }}</h1>").unwrap();
        fs::write(dir.join("list.html"), "{% for x in items %}{{ x }}{% endfor %}").unwrap();

        let mut templates = HtmlTemplates::new();
        let pattern = format!("{}/*.html", dir.display());
        assert_eq!(templates.load_glob(&pattern).unwrap(), 2);
        assert_eq!(
            templates.render("list.html", &json!({ "items": [1, 2, 3] })).unwrap(),
            "123"
        );

        let empty = format!("{}/*.tmpl", dir.display());
        assert!(matches!(
            templates.load_glob(&empty),
            Err(Error::EmptyGlob(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
