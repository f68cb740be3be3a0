#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Menu registry tests against the fixture menu files.

mod common;

use std::sync::Arc;

use wayfinder_kernel::access::{Gate, GateAccessHandler};
use wayfinder_kernel::locale::CatalogTranslator;
use wayfinder_kernel::menu::{ConfigFormat, MenuRegistry, find_item};
use wayfinder_kernel::{MenuError, MenuItems};
use wayfinder_test_utils::{anonymous_user, assert, test_url, test_user};

use common::{fixture, load_registry, registry_generator};

#[test]
fn test_load_yaml_menus() {
    let registry = load_registry("menus.yml");

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), vec!["admin", "main"]);
    assert_eq!(
        registry.get("main").unwrap().ids(),
        vec!["home", "users", "reports", "docs", "login", "logout"]
    );
    assert_eq!(
        registry.routes().routes.get("users.show").map(String::as_str),
        Some("/users/:id")
    );
    assert_eq!(
        registry.routes().actions.get("ReportController@index").map(String::as_str),
        Some("/reports/{year?}")
    );
}

#[test]
fn test_make_main_menu() {
    let registry = load_registry("menus.yml");
    let mut generator = registry_generator(&registry, "/users/42");
    generator.set_param("userId", "42");

    let menu = registry.make("main", &mut generator).unwrap();

    assert::ids(&menu, &["home", "users", "reports", "docs", "login", "logout"]);
    assert_eq!(menu[0].url, test_url("/"));
    assert!(!menu[0].active);

    let users = find_item(&menu, "users").unwrap();
    assert_eq!(users.url, test_url("/users"));
    assert!(users.active);
    assert_eq!(users.class, "active");

    let profile = find_item(&menu, "users/profile").unwrap();
    assert_eq!(profile.title, "My profile");
    assert_eq!(profile.url, test_url("/users/42"));
    assert!(profile.active);

    let settings = find_item(&menu, "users/settings").unwrap();
    assert_eq!(settings.title, "Settings");
    assert_eq!(settings.url, test_url("/settings/42"));
    assert!(!settings.active);

    let reports = find_item(&menu, "reports").unwrap();
    assert_eq!(reports.url, test_url("/reports"));

    let docs = find_item(&menu, "docs").unwrap();
    assert_eq!(docs.url, "https://docs.example.com");
    assert_eq!(docs.class, "external");

    assert_eq!(generator.current_id(), Some("users"));
    assert::only_render_fields(&menu);
}

#[test]
fn test_make_with_access_control() {
    let registry = load_registry("menus.yml");
    let gate = Arc::new(Gate::new());

    let mut generator = registry_generator(&registry, "/")
        .with_access_handler(Arc::new(GateAccessHandler::new(gate.clone(), anonymous_user())));
    let menu = registry.make("main", &mut generator).unwrap();
    assert::ids(&menu, &["home", "users", "docs", "login"]);

    let mut generator = registry_generator(&registry, "/")
        .with_access_handler(Arc::new(GateAccessHandler::new(gate, test_user(&["editor"]))));
    let menu = registry.make("main", &mut generator).unwrap();
    assert::ids(&menu, &["home", "users", "reports", "docs", "logout"]);
}

#[test]
fn test_make_admin_menu_with_gate() {
    let registry = load_registry("menus.yml");
    let gate = Arc::new(
        Gate::new()
            .define("view-dashboard", |subject, _| subject.has_role("staff"))
            .define("edit-user", |_, params| {
                params.first().is_some_and(|id| id == "42")
            }),
    );

    let mut generator = registry_generator(&registry, "/admin/users").with_access_handler(
        Arc::new(GateAccessHandler::new(gate.clone(), test_user(&["staff"]))),
    );
    generator.set_param("userId", "42");
    let menu = registry.make("admin", &mut generator).unwrap();

    assert::ids(&menu, &["dashboard", "users"]);
    // the dashboard is exact, so viewing a nested page does not activate it
    assert!(!menu[0].active);
    assert!(menu[1].active);

    let mut generator = registry_generator(&registry, "/admin").with_access_handler(Arc::new(
        GateAccessHandler::new(gate, test_user(&["guest"])),
    ));
    generator.set_param("userId", "7");
    let menu = registry.make("admin", &mut generator).unwrap();
    assert!(menu.is_empty());
}

#[test]
fn test_translated_titles() {
    let registry = load_registry("menus.yml");
    let translator = CatalogTranslator::from_file(&fixture("translations.yml")).unwrap();
    assert_eq!(translator.len(), 3);

    let mut generator = registry_generator(&registry, "/").with_translator(Arc::new(translator));
    generator.set_param("userId", "1");
    let menu = registry.make("main", &mut generator).unwrap();

    assert_eq!(find_item(&menu, "home").unwrap().title, "Inicio");
    assert_eq!(find_item(&menu, "users").unwrap().title, "Usuarios");
    assert_eq!(find_item(&menu, "users/profile").unwrap().title, "My profile");
    assert_eq!(find_item(&menu, "users/settings").unwrap().title, "Settings");
    assert_eq!(find_item(&menu, "reports").unwrap().title, "Informes");
    assert_eq!(find_item(&menu, "docs").unwrap().title, "Docs");
}

#[test]
fn test_load_json_menus_keeps_order() {
    let registry = load_registry("menus.json");
    assert_eq!(registry.names(), vec!["footer"]);

    let mut generator = registry_generator(&registry, "/posts/7");
    let menu = registry.make("footer", &mut generator).unwrap();

    assert::ids(&menu, &["zeta", "alpha", "contact_us"]);
    assert_eq!(menu[1].url, test_url("/posts/7"));
    assert!(menu[1].active);
    assert_eq!(menu[2].title, "Contact Us");
    assert_eq!(menu[2].url, "#");
}

#[test]
fn test_load_toml_menus() {
    let registry = load_registry("menus.toml");
    let mut generator = registry_generator(&registry, "/");
    generator.set_param("userId", "5");

    let menu = registry.make("sidebar", &mut generator).unwrap();

    assert::ids(&menu, &["profile", "help"]);
    assert_eq!(menu[0].url, test_url("/users/5"));
    assert_eq!(menu[1].url, "https://help.example.com");
    assert_eq!(menu[1].class, "external");
}

#[test]
fn test_unknown_menu() {
    let registry = load_registry("menus.yml");
    let mut generator = registry_generator(&registry, "/");
    let err = registry.make("nope", &mut generator).unwrap_err();
    assert!(matches!(err, MenuError::UnknownMenu(ref name) if name == "nope"));
}

#[test]
fn test_unsupported_or_missing_files() {
    let err = MenuRegistry::from_file(&fixture("translations.txt")).unwrap_err();
    assert!(matches!(err, MenuError::Config(_)));

    let err = MenuRegistry::from_file(&fixture("missing.yml")).unwrap_err();
    assert!(matches!(err, MenuError::Config(_)));
}

#[test]
fn test_invalid_menu_source() {
    let err = MenuRegistry::from_source("menus:\n  main:\n    home: { link: / }\n", ConfigFormat::Yaml)
        .unwrap_err();
    assert!(matches!(err, MenuError::Config(_)));
}

#[test]
fn test_register_replaces_menu() {
    let mut registry = load_registry("menus.json");
    registry.register("footer", MenuItems::new());
    assert_eq!(registry.len(), 1);
    assert!(registry.get("footer").unwrap().is_empty());
}
