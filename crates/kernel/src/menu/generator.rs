//! Menu tree generation.
//!
//! Turns a [`MenuItems`] definition into render-ready [`MenuItem`]s. For each
//! item, in declaration order:
//! - access rules are checked (denied items vanish with their submenu)
//! - the title is taken literally, translated, or derived from the id
//! - the URL is resolved from `full_url`, `url`, `route` or `action`
//! - the submenu is generated
//! - active state is computed and the active class appended

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::item::MenuItem;
use super::params::DynamicParams;
use super::title::title_case;
use super::{MenuItemSpec, MenuItems};
use crate::access::{AccessHandler, AccessRules};
use crate::error::{MenuError, MenuResult};
use crate::locale::Translator;
use crate::routing::UrlResolver;

/// URL of items without a target.
pub const PLACEHOLDER_URL: &str = "#";

/// Deepest submenu nesting accepted by [`MenuGenerator::generate`].
pub const MAX_MENU_DEPTH: usize = 32;

/// Key prefix used for translated titles.
const TITLE_KEY_PREFIX: &str = "menu.";

/// Custom active state check, replacing the built-in URL matching.
pub type ActiveUrlResolver = Box<dyn Fn(&MenuItem) -> bool + Send + Sync>;

/// Presentation options shared by every generated menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuOptions {
    /// CSS class appended to active items (default: "active").
    pub active_class: String,
    /// Whether `url` targets are secure unless the item says otherwise.
    pub default_secure: bool,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            active_class: "active".to_string(),
            default_secure: false,
        }
    }
}

/// Generates menu trees for one request.
///
/// Setters mutate the generation context, so a generator must not be shared
/// between concurrent requests; build one per request instead.
pub struct MenuGenerator {
    urls: Arc<dyn UrlResolver>,
    translator: Option<Arc<dyn Translator>>,
    access: Option<Arc<dyn AccessHandler>>,
    active_url: String,
    base_url: String,
    active_class: String,
    default_secure: bool,
    params: DynamicParams,
    active_url_resolver: Option<ActiveUrlResolver>,
    current_id: Option<String>,
}

impl MenuGenerator {
    /// Create a generator; active and base URLs come from the resolver.
    pub fn new(urls: Arc<dyn UrlResolver>) -> Self {
        let options = MenuOptions::default();
        Self {
            active_url: urls.current(),
            base_url: urls.base(),
            urls,
            translator: None,
            access: None,
            active_class: options.active_class,
            default_secure: options.default_secure,
            params: DynamicParams::new(),
            active_url_resolver: None,
            current_id: None,
        }
    }

    /// Translate titles that are not set literally.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Filter items through an access handler.
    pub fn with_access_handler(mut self, access: Arc<dyn AccessHandler>) -> Self {
        self.access = Some(access);
        self
    }

    /// Apply presentation options.
    pub fn with_options(mut self, options: MenuOptions) -> Self {
        self.active_class = options.active_class;
        self.default_secure = options.default_secure;
        self
    }

    /// Replace all dynamic parameters.
    pub fn set_params(&mut self, params: DynamicParams) -> &mut Self {
        self.params = params;
        self
    }

    /// Register one dynamic parameter.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.set(key, value);
        self
    }

    pub fn set_active_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.active_class = class.into();
        self
    }

    pub fn set_default_secure(&mut self, secure: bool) -> &mut Self {
        self.default_secure = secure;
        self
    }

    /// Decide active state with `resolver` instead of URL matching.
    ///
    /// The resolver sees the item with its title, URL, class and generated
    /// submenu, before the active class is applied.
    pub fn set_active_url_resolver<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&MenuItem) -> bool + Send + Sync + 'static,
    {
        self.active_url_resolver = Some(Box::new(resolver));
        self
    }

    pub fn set_active_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.active_url = url.into();
        self
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.base_url = url.into();
        self
    }

    pub fn params(&self) -> &DynamicParams {
        &self.params
    }

    pub fn active_url(&self) -> &str {
        &self.active_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Id of the last directly active item found by [`generate`](Self::generate).
    ///
    /// A pass that finds no active item leaves the previous value in place.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Generate the menu tree for `items`.
    pub fn generate(&mut self, items: &MenuItems) -> MenuResult<Vec<MenuItem>> {
        let mut current = None;
        let generated = self.generate_items(items, 0, &mut current)?;
        if current.is_some() {
            self.current_id = current;
        }
        debug!(
            items = generated.len(),
            current = ?self.current_id,
            "generated menu"
        );
        Ok(generated)
    }

    /// Generate one level; `current` collects the last directly active id.
    fn generate_items(
        &self,
        items: &MenuItems,
        depth: usize,
        current: &mut Option<String>,
    ) -> MenuResult<Vec<MenuItem>> {
        let mut generated = Vec::with_capacity(items.len());

        for (id, spec) in items.iter() {
            if !self.check_access(spec) {
                debug!(item = %id, "menu item hidden by access rules");
                continue;
            }

            let title = self.title(id, spec.title.as_deref());
            let url = self.generate_url(spec)?;

            let submenu = match &spec.submenu {
                Some(_) if depth + 1 >= MAX_MENU_DEPTH => {
                    return Err(MenuError::TooDeep {
                        id: id.to_string(),
                        max: MAX_MENU_DEPTH,
                    });
                }
                Some(children) => Some(self.generate_items(children, depth + 1, current)?),
                None => None,
            };

            let mut item = MenuItem {
                id: id.to_string(),
                title,
                url,
                class: spec.class.clone().unwrap_or_default(),
                active: false,
                submenu,
            };

            if self.is_active_url(&item, spec.exact.unwrap_or(false)) {
                item.active = true;
                *current = Some(item.id.clone());
            } else if let Some(children) = &item.submenu {
                item.active = children.iter().any(|child| child.active);
            }

            if item.active {
                item.class.push(' ');
                item.class.push_str(&self.active_class);
            }
            item.class = item.class.trim().to_string();

            generated.push(item);
        }

        Ok(generated)
    }

    fn check_access(&self, spec: &MenuItemSpec) -> bool {
        let Some(access) = &self.access else {
            return true;
        };

        let rules = AccessRules {
            allows: spec.allows.as_ref().map(|r| self.params.substitute_target(r)),
            check: spec.check.as_ref().map(|r| self.params.substitute_target(r)),
            denies: spec.denies.as_ref().map(|r| self.params.substitute_target(r)),
            roles: spec.roles.clone(),
            logged: spec.logged,
        };

        access.check(&rules)
    }

    fn title(&self, id: &str, title: Option<&str>) -> String {
        if let Some(title) = title {
            return title.to_string();
        }

        if let Some(translator) = &self.translator {
            let key = format!("{TITLE_KEY_PREFIX}{id}");
            let translation = translator.get(&key);
            if translation != key {
                return translation;
            }
        }

        title_case(id)
    }

    /// Resolve the item URL: `full_url`, then `url`, `route`, `action`, else `#`.
    fn generate_url(&self, spec: &MenuItemSpec) -> MenuResult<String> {
        if let Some(full_url) = &spec.full_url {
            return Ok(full_url.clone());
        }

        if let Some(target) = &spec.url {
            let params = self.params.substitute(&target.params);
            let secure = spec.secure.unwrap_or(self.default_secure);
            return Ok(self.urls.to(&target.name, &params, secure)?);
        }

        if let Some(target) = &spec.route {
            let params = self.params.substitute(&target.params);
            return Ok(self.urls.route(&target.name, &params)?);
        }

        if let Some(target) = &spec.action {
            let params = self.params.substitute(&target.params);
            return Ok(self.urls.action(&target.name, &params)?);
        }

        Ok(PLACEHOLDER_URL.to_string())
    }

    fn is_active_url(&self, item: &MenuItem, exact: bool) -> bool {
        if let Some(resolver) = &self.active_url_resolver {
            return resolver(item);
        }

        if item.url == PLACEHOLDER_URL {
            return false;
        }

        if exact || item.url == self.base_url {
            return self.active_url == item.url;
        }

        is_url_prefix(&item.url, &self.active_url)
    }
}

/// Check if `url` is a prefix of `active_url` ending on a path boundary.
///
/// `/admin` matches `/admin`, `/admin/users` and `/admin?tab=2`, but not
/// `/admin2`.
fn is_url_prefix(url: &str, active_url: &str) -> bool {
    let Some(rest) = active_url.strip_prefix(url) else {
        return false;
    };

    rest.is_empty() || url.ends_with('/') || rest.starts_with(['/', '?', '#'])
}

impl fmt::Debug for MenuGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuGenerator")
            .field("active_url", &self.active_url)
            .field("base_url", &self.base_url)
            .field("active_class", &self.active_class)
            .field("default_secure", &self.default_secure)
            .field("params", &self.params)
            .field("translator", &self.translator.is_some())
            .field("access", &self.access.is_some())
            .field("active_url_resolver", &self.active_url_resolver.is_some())
            .field("current_id", &self.current_id)
            .finish()
    }
}
