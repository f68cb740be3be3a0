#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests run against the real kernel code and the menu files under
//! `tests/fixtures`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use wayfinder_kernel::MenuRegistry;
use wayfinder_kernel::menu::MenuGenerator;
use wayfinder_kernel::routing::RouteUrlResolver;
use wayfinder_test_utils::{TEST_BASE_URL, test_url};

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a registry from a fixture menu file.
pub fn load_registry(name: &str) -> MenuRegistry {
    MenuRegistry::from_file(&fixture(name)).expect("fixture menu file should load")
}

/// Generator over the registry's own route table for a page at `current_path`.
pub fn registry_generator(registry: &MenuRegistry, current_path: &str) -> MenuGenerator {
    let resolver = RouteUrlResolver::new(TEST_BASE_URL, registry.routes().clone())
        .expect("test base url should parse")
        .with_current(test_url(current_path));
    MenuGenerator::new(Arc::new(resolver))
}
