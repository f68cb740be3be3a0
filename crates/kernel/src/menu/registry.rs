//! Menu registry - named menus loaded from configuration files.
//!
//! A menu file declares the route table used to resolve `route`/`action`
//! targets and any number of named menus:
//!
//! ```yaml
//! routes:
//!   users.show: /users/:id
//! actions:
//!   AdminController@index: /admin
//! menus:
//!   main:
//!     home: { url: / }
//!     profile: { route: [users.show, ":userId"] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{MenuGenerator, MenuItem, MenuItems};
use crate::error::{MenuError, MenuResult};
use crate::routing::RouteTable;

/// Supported menu file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Contents of a menu file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuFile {
    /// Route name -> path pattern.
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
    /// Action name -> path pattern.
    #[serde(default)]
    pub actions: BTreeMap<String, String>,
    /// Menu name -> item tree.
    #[serde(default)]
    pub menus: BTreeMap<String, MenuItems>,
}

impl MenuFile {
    /// Parse a menu file from source text.
    pub fn parse(source: &str, format: ConfigFormat) -> MenuResult<Self> {
        let parsed = match format {
            ConfigFormat::Yaml => serde_yml::from_str(source).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(source).map_err(|e| e.to_string()),
        };
        parsed.map_err(MenuError::Config)
    }

    /// Route table declared by the file.
    pub fn route_table(&self) -> RouteTable {
        RouteTable {
            routes: self.routes.clone(),
            actions: self.actions.clone(),
        }
    }
}

/// Registry of named menu definitions.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    /// Menu definitions, indexed by name
    menus: HashMap<String, MenuItems>,
    /// Route table the menus were declared with
    routes: RouteTable,
}

impl MenuRegistry {
    /// Create an empty menu registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a YAML, JSON or TOML menu file.
    pub fn from_file(path: &Path) -> MenuResult<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            MenuError::Config(format!(
                "unsupported menu file extension: {}",
                path.display()
            ))
        })?;

        let source = std::fs::read_to_string(path)
            .map_err(|e| MenuError::Config(format!("failed to read {}: {e}", path.display())))?;

        let registry = Self::from_source(&source, format)?;
        debug!(
            path = %path.display(),
            menus = registry.len(),
            "loaded menu file"
        );
        Ok(registry)
    }

    /// Create a registry from menu file source text.
    pub fn from_source(source: &str, format: ConfigFormat) -> MenuResult<Self> {
        Ok(Self::from_menu_file(MenuFile::parse(source, format)?))
    }

    /// Create a registry from a parsed menu file.
    pub fn from_menu_file(file: MenuFile) -> Self {
        let mut registry = Self {
            menus: HashMap::new(),
            routes: file.route_table(),
        };

        for (name, items) in file.menus {
            registry.register(name, items);
        }

        registry
    }

    /// Register a menu, replacing any menu with the same name.
    pub fn register(&mut self, name: impl Into<String>, items: MenuItems) {
        let name = name.into();
        if self.menus.insert(name.clone(), items).is_some() {
            warn!(menu = %name, "replaced existing menu definition");
        }
    }

    /// Get a menu definition by name.
    pub fn get(&self, name: &str) -> Option<&MenuItems> {
        self.menus.get(name)
    }

    /// Menu names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.menus.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route table declared alongside the menus.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Generate the named menu.
    pub fn make(&self, name: &str, generator: &mut MenuGenerator) -> MenuResult<Vec<MenuItem>> {
        let items = self
            .get(name)
            .ok_or_else(|| MenuError::UnknownMenu(name.to_string()))?;
        generator.generate(items)
    }

    /// Get menu count.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::menu::MenuItemSpec;
    use crate::routing::RouteUrlResolver;

    const YAML: &str = r#"
routes:
  users.show: /users/:id
menus:
  main:
    home:
      url: /
    profile:
      route: [users.show, ":userId"]
  footer:
    legal:
      full_url: https://legal.example.test
"#;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("menus.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("menus.YAML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("menus.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("menus.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("menus.ini")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("menus")), None);
    }

    #[test]
    fn registry_from_yaml() {
        let registry = MenuRegistry::from_source(YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["footer", "main"]);
        assert_eq!(registry.get("main").unwrap().ids(), vec!["home", "profile"]);
        assert_eq!(
            registry.routes().routes.get("users.show").map(String::as_str),
            Some("/users/:id")
        );
    }

    #[test]
    fn registry_from_json() {
        let json = r#"{"menus": {"main": {"b": {"url": "b"}, "a": {"url": "a"}}}}"#;
        let registry = MenuRegistry::from_source(json, ConfigFormat::Json).unwrap();
        assert_eq!(registry.get("main").unwrap().ids(), vec!["b", "a"]);
        assert!(registry.routes().is_empty());
    }

    #[test]
    fn registry_from_toml() {
        let toml_src = r#"
[routes]
"blog.index" = "/blog"

[menus.main.blog]
route = "blog.index"
"#;
        let registry = MenuRegistry::from_source(toml_src, ConfigFormat::Toml).unwrap();
        assert_eq!(registry.get("main").unwrap().ids(), vec!["blog"]);
    }

    #[test]
    fn invalid_source_is_config_error() {
        let err = MenuRegistry::from_source("menus: {main: {home: {href: /}}}", ConfigFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, MenuError::Config(_)));
    }

    #[test]
    fn unsupported_extension() {
        let err = MenuRegistry::from_file(Path::new("menus.ini")).unwrap_err();
        assert!(matches!(err, MenuError::Config(_)));
    }

    #[test]
    fn register_replaces() {
        let mut registry = MenuRegistry::new();
        registry.register("main", MenuItems::new());
        registry.register(
            "main",
            MenuItems::new().with("home", MenuItemSpec::default()),
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("main").unwrap().len(), 1);
    }

    #[test]
    fn make_generates_named_menu() {
        let registry = MenuRegistry::from_source(YAML, ConfigFormat::Yaml).unwrap();
        let urls = RouteUrlResolver::new("http://example.test", registry.routes().clone())
            .unwrap()
            .with_current("http://example.test/users/42");
        let mut generator = MenuGenerator::new(Arc::new(urls));
        generator.set_param("userId", "42");

        let menu = registry.make("main", &mut generator).unwrap();
        assert_eq!(menu[1].url, "http://example.test/users/42");
        assert!(menu[1].active);
        assert!(!menu[0].active);

        assert!(matches!(
            registry.make("sidebar", &mut generator),
            Err(MenuError::UnknownMenu(name)) if name == "sidebar"
        ));
    }
}
