//! Menu renderer with Tera templates and suggestion resolution.

use std::path::Path;

use serde::Serialize;
use tera::Tera;
use tracing::debug;

use crate::error::{MenuError, MenuResult};
use crate::menu::MenuItem;

/// Name of the built-in menu template.
pub const DEFAULT_TEMPLATE: &str = "menu.html";

/// Class given to nested `<ul>` elements.
const SUBMENU_CLASS: &str = "submenu";

const DEFAULT_TEMPLATE_SOURCE: &str = r#"<ul{% if class %} class="{{ class }}"{% endif %}>
{%- for item in items %}
<li{% if item.class %} class="{{ item.class }}"{% endif %}><a href="{{ item.url }}">{{ item.title }}</a>{{ item.children | safe }}</li>
{%- endfor %}
</ul>"#;

/// One item as seen by menu templates, with its submenu already rendered.
#[derive(Debug, Serialize)]
struct RenderedItem<'a> {
    id: &'a str,
    title: &'a str,
    url: &'a str,
    class: &'a str,
    active: bool,
    children: String,
}

/// Renders generated menus to HTML.
///
/// Every menu level is rendered with the same template, innermost first; the
/// template receives `menu`, `class`, `depth` and `items`, where each item
/// carries `id`, `title`, `url`, `class`, `active` and `children` (the
/// rendered submenu markup).
pub struct MenuRenderer {
    /// Tera template engine instance.
    tera: Tera,
}

impl MenuRenderer {
    /// Create a renderer with only the built-in template.
    pub fn new() -> MenuResult<Self> {
        let mut tera = Tera::default();
        Self::configure(&mut tera);
        tera.add_raw_template(DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_SOURCE)?;
        Ok(Self { tera })
    }

    /// Create a renderer loading `*.html` templates from `template_dir`.
    ///
    /// A `menu.html` in the directory overrides the built-in template.
    pub fn from_dir(template_dir: &Path) -> MenuResult<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern.to_str().ok_or_else(|| {
            MenuError::Config(format!(
                "invalid template directory path: {}",
                template_dir.display()
            ))
        })?;

        let mut tera = Tera::new(pattern_str)?;
        Self::configure(&mut tera);
        if tera.get_template(DEFAULT_TEMPLATE).is_err() {
            tera.add_raw_template(DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_SOURCE)?;
        }

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded menu templates");

        Ok(Self { tera })
    }

    fn configure(tera: &mut Tera) {
        tera.set_escape_fn(escape_html);
    }

    /// Add or replace a template at runtime.
    pub fn add_template(&mut self, name: &str, source: &str) -> MenuResult<()> {
        self.tera.add_raw_template(name, source)?;
        Ok(())
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                return Some(template_name);
            }

            if self.tera.get_template(suggestion).is_ok() {
                return Some((*suggestion).to_string());
            }
        }

        None
    }

    /// Template suggestions for a named menu, most specific first.
    ///
    /// `main` yields `["menu--main", "menu"]`.
    pub fn menu_suggestions(name: &str) -> Vec<String> {
        let name = name.trim().replace(['_', ' '], "-").to_lowercase();
        if name.is_empty() {
            return vec!["menu".to_string()];
        }
        vec![format!("menu--{name}"), "menu".to_string()]
    }

    /// Render a generated menu; `class` applies to the outer `<ul>`.
    pub fn render(&self, name: &str, items: &[MenuItem], class: Option<&str>) -> MenuResult<String> {
        let suggestions = Self::menu_suggestions(name);
        let suggestion_refs: Vec<&str> = suggestions.iter().map(|s| s.as_str()).collect();

        let template = self
            .resolve_template(&suggestion_refs)
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        self.render_level(&template, name, items, class.unwrap_or_default(), 0)
    }

    /// Render a generated menu with an explicit template.
    pub fn render_with(
        &self,
        template: &str,
        items: &[MenuItem],
        class: Option<&str>,
    ) -> MenuResult<String> {
        self.render_level(template, "", items, class.unwrap_or_default(), 0)
    }

    /// Render one menu level, children first.
    fn render_level(
        &self,
        template: &str,
        name: &str,
        items: &[MenuItem],
        class: &str,
        depth: usize,
    ) -> MenuResult<String> {
        let mut rendered = Vec::with_capacity(items.len());

        for item in items {
            let children = match &item.submenu {
                Some(children) if !children.is_empty() => {
                    self.render_level(template, name, children, SUBMENU_CLASS, depth + 1)?
                }
                _ => String::new(),
            };

            rendered.push(RenderedItem {
                id: &item.id,
                title: &item.title,
                url: &item.url,
                class: &item.class,
                active: item.active,
                children,
            });
        }

        let mut context = tera::Context::new();
        context.insert("menu", name);
        context.insert("class", class);
        context.insert("depth", &depth);
        context.insert("items", &rendered);

        Ok(self.tera.render(template, &context)?)
    }
}

impl std::fmt::Debug for MenuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.tera.get_template_names().collect();
        names.sort_unstable();
        f.debug_struct("MenuRenderer")
            .field("templates", &names)
            .finish()
    }
}

/// HTML escaping that leaves `/` alone so URLs stay readable.
fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}
