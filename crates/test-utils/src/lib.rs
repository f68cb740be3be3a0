//! Wayfinder test utilities.
//!
//! Helpers for integration testing: menu definition builders, a standard
//! route table, recording access handlers, and assertion utilities for
//! generated menus.

use std::sync::Arc;

use parking_lot::Mutex;
use wayfinder_kernel::access::{AccessHandler, AccessRules, Subject};
use wayfinder_kernel::locale::CatalogTranslator;
use wayfinder_kernel::menu::{MenuGenerator, MenuItemSpec, MenuItems, Target};
use wayfinder_kernel::routing::{RouteTable, RouteUrlResolver};

/// Base URL used by the test resolver.
pub const TEST_BASE_URL: &str = "http://localhost:3000";

/// Start building a menu item definition.
pub fn test_item() -> TestItem {
    TestItem {
        spec: MenuItemSpec::default(),
    }
}

/// Collect `(id, item)` pairs into an ordered item list.
pub fn items<'a, I>(entries: I) -> MenuItems
where
    I: IntoIterator<Item = (&'a str, TestItem)>,
{
    entries
        .into_iter()
        .map(|(id, item)| (id.to_string(), item.build()))
        .collect()
}

/// A menu item builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestItem {
    spec: MenuItemSpec,
}

impl TestItem {
    /// Set a literal title.
    pub fn titled(mut self, title: &str) -> Self {
        self.spec.title = Some(title.to_string());
        self
    }

    /// Link to an application path.
    pub fn url(mut self, path: &str) -> Self {
        self.spec.url = Some(Target::new(path));
        self
    }

    /// Link to an application path with extra segments.
    pub fn url_with(mut self, path: &str, params: &[&str]) -> Self {
        self.spec.url = Some(Target::with_params(path, params.iter().copied()));
        self
    }

    /// Link to an absolute URL.
    pub fn full_url(mut self, url: &str) -> Self {
        self.spec.full_url = Some(url.to_string());
        self
    }

    /// Link to a named route.
    pub fn route(mut self, name: &str) -> Self {
        self.spec.route = Some(Target::new(name));
        self
    }

    /// Link to a named route with parameters.
    pub fn route_with(mut self, name: &str, params: &[&str]) -> Self {
        self.spec.route = Some(Target::with_params(name, params.iter().copied()));
        self
    }

    /// Link to a controller action.
    pub fn action(mut self, name: &str) -> Self {
        self.spec.action = Some(Target::new(name));
        self
    }

    /// Link to a controller action with parameters.
    pub fn action_with(mut self, name: &str, params: &[&str]) -> Self {
        self.spec.action = Some(Target::with_params(name, params.iter().copied()));
        self
    }

    /// Override the secure flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.spec.secure = Some(secure);
        self
    }

    /// Only match the current URL exactly.
    pub fn exact(mut self) -> Self {
        self.spec.exact = Some(true);
        self
    }

    /// Set CSS classes.
    pub fn class(mut self, class: &str) -> Self {
        self.spec.class = Some(class.to_string());
        self
    }

    /// Require a gate ability.
    pub fn allows(mut self, ability: &str, params: &[&str]) -> Self {
        self.spec.allows = Some(Target::with_params(ability, params.iter().copied()));
        self
    }

    /// Require a gate ability (checked like `allows`).
    pub fn check(mut self, ability: &str, params: &[&str]) -> Self {
        self.spec.check = Some(Target::with_params(ability, params.iter().copied()));
        self
    }

    /// Require a gate ability to be denied.
    pub fn denies(mut self, ability: &str, params: &[&str]) -> Self {
        self.spec.denies = Some(Target::with_params(ability, params.iter().copied()));
        self
    }

    /// Restrict to roles.
    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.spec.roles = Some(roles.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Require the given authentication state.
    pub fn logged(mut self, logged: bool) -> Self {
        self.spec.logged = Some(logged);
        self
    }

    /// Set the submenu.
    pub fn submenu(mut self, children: MenuItems) -> Self {
        self.spec.submenu = Some(children);
        self
    }

    /// Finish the definition.
    pub fn build(self) -> MenuItemSpec {
        self.spec
    }
}

/// Route table shared by integration tests.
pub fn test_routes() -> RouteTable {
    RouteTable::new()
        .with_route("home", "/")
        .with_route("users.index", "/users")
        .with_route("users.show", "/users/:id")
        .with_route("users.edit", "/users/{id}/edit")
        .with_route("admin.dashboard", "/admin")
        .with_route("admin.users", "/admin/users")
        .with_action("UserController@index", "/users")
        .with_action("UserController@show", "/users/{id}")
}

/// Create a resolver over [`test_routes`] for a page at `current_path`.
pub fn test_resolver(current_path: &str) -> RouteUrlResolver {
    let resolver = match RouteUrlResolver::new(TEST_BASE_URL, test_routes()) {
        Ok(resolver) => resolver,
        Err(e) => panic!("test base url must parse: {e}"),
    };
    resolver.with_current(test_url(current_path))
}

/// Absolute URL for `path` under [`TEST_BASE_URL`].
pub fn test_url(path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        TEST_BASE_URL.to_string()
    } else {
        format!("{TEST_BASE_URL}/{path}")
    }
}

/// Create a generator for a page at `current_path`.
pub fn test_generator(current_path: &str) -> MenuGenerator {
    MenuGenerator::new(Arc::new(test_resolver(current_path)))
}

/// Create a translator from `(key, translation)` pairs.
pub fn test_translator(entries: &[(&str, &str)]) -> Arc<CatalogTranslator> {
    Arc::new(
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

/// Create a logged-in test user with roles.
pub fn test_user(roles: &[&str]) -> Subject {
    Subject::authenticated(roles.iter().copied())
}

/// Create an anonymous test user.
pub fn anonymous_user() -> Subject {
    Subject::anonymous()
}

/// Create an admin test user.
pub fn admin_user() -> Subject {
    Subject::superuser()
}

/// Access handler that records every rule set it is asked about.
#[derive(Debug)]
pub struct RecordingAccess {
    allow: bool,
    seen: Mutex<Vec<AccessRules>>,
}

impl RecordingAccess {
    /// Create a handler answering `allow` to every check.
    pub fn new(allow: bool) -> Arc<Self> {
        Arc::new(Self {
            allow,
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Rule sets checked so far, in call order.
    pub fn seen(&self) -> Vec<AccessRules> {
        self.seen.lock().clone()
    }

    /// Number of checks performed.
    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

impl AccessHandler for RecordingAccess {
    fn check(&self, rules: &AccessRules) -> bool {
        self.seen.lock().push(rules.clone());
        self.allow
    }
}

/// Assertion helpers for generated menus.
pub mod assert {
    use serde_json::Value;
    use wayfinder_kernel::menu::{MenuItem, active_trail};

    /// Keys a serialized menu item may carry.
    pub const ITEM_KEYS: &[&str] = &["id", "title", "url", "class", "active", "submenu"];

    /// Assert the ids of one menu level, in order.
    pub fn ids(items: &[MenuItem], expected: &[&str]) {
        let actual: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(actual, expected, "menu ids mismatch");
    }

    /// Assert the active trail, outermost first.
    pub fn trail(items: &[MenuItem], expected: &[&str]) {
        assert_eq!(active_trail(items), expected, "active trail mismatch");
    }

    /// Assert that serialized items only carry render fields, at every depth.
    pub fn only_render_fields(items: &[MenuItem]) {
        let value = match serde_json::to_value(items) {
            Ok(value) => value,
            Err(e) => panic!("menu must serialize: {e}"),
        };
        check_level(&value);
    }

    fn check_level(value: &Value) {
        let Some(items) = value.as_array() else {
            panic!("Expected a list of menu items, got: {value}");
        };
        for item in items {
            let Some(object) = item.as_object() else {
                panic!("Expected a menu item object, got: {item}");
            };
            for key in object.keys() {
                assert!(
                    ITEM_KEYS.contains(&key.as_str()),
                    "Unexpected key '{key}' in menu item: {item}"
                );
            }
            if let Some(children) = object.get("submenu").filter(|v| !v.is_null()) {
                check_level(children);
            }
        }
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}
