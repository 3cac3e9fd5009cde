//! HTML page templates
//!
//! Templates live in `templates/` as standalone files and are compiled into the
//! binary. Names end in `.html`, so minijinja auto-escapes every value; entry
//! bodies are shown as escaped markdown source.

use minijinja::{Environment, Value};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("entry.html", include_str!("../templates/entry.html")),
    ("not_found.html", include_str!("../templates/not_found.html")),
    ("search.html", include_str!("../templates/search.html")),
    ("_entry_form.html", include_str!("../templates/_entry_form.html")),
    ("new.html", include_str!("../templates/new.html")),
    ("edit.html", include_str!("../templates/edit.html")),
];

/// Static page served when a request fails; never rendered, so it cannot fail itself
pub const ERROR_PAGE: &str = include_str!("../templates/error.html");

/// URL of an entry's page (e.g. "Hello World" -> "/wiki/Hello%20World")
pub fn entry_url(title: &str) -> String {
    format!("/wiki/{}", urlencoding::encode(title))
}

/// URL of an entry's edit page
pub fn edit_url(title: &str) -> String {
    format!("/edit/{}", urlencoding::encode(title))
}

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        // Percent-encoded output has nothing left to escape
        env.add_filter("entry_url", |title: String| {
            Value::from_safe_string(entry_url(&title))
        });
        env.add_filter("edit_url", |title: String| {
            Value::from_safe_string(edit_url(&title))
        });

        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
